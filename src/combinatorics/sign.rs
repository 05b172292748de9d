#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sign {
  #[default]
  Pos = 1,
  Neg = -1,
}

impl Sign {
  pub fn from_bool(b: bool) -> Self {
    match b {
      true => Self::Pos,
      false => Self::Neg,
    }
  }

  /// Even permutations preserve orientation, odd ones invert it.
  pub fn from_parity(n: usize) -> Self {
    match n % 2 {
      0 => Self::Pos,
      _ => Self::Neg,
    }
  }

  /// Orientation of the traversal `a -> b` relative to the
  /// canonical (ascending) orientation of the edge `{a, b}`.
  pub fn from_order<T: Ord>(a: &T, b: &T) -> Self {
    Self::from_bool(a < b)
  }

  pub fn other(self) -> Self {
    match self {
      Self::Pos => Self::Neg,
      Self::Neg => Self::Pos,
    }
  }

  pub fn as_i32(self) -> i32 {
    self as i32
  }
  pub fn as_f64(self) -> f64 {
    self as i32 as f64
  }

  pub fn is_pos(self) -> bool {
    self == Self::Pos
  }
  pub fn is_neg(self) -> bool {
    self == Self::Neg
  }
}

impl std::ops::Neg for Sign {
  type Output = Self;
  fn neg(self) -> Self::Output {
    self.other()
  }
}
impl std::ops::Mul for Sign {
  type Output = Self;
  fn mul(self, other: Self) -> Self::Output {
    Self::from_bool(self == other)
  }
}
impl std::ops::MulAssign for Sign {
  fn mul_assign(&mut self, other: Self) {
    *self = *self * other;
  }
}

impl std::fmt::Display for Sign {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let c = match self {
      Self::Pos => '+',
      Self::Neg => '-',
    };
    write!(f, "{c}")
  }
}
