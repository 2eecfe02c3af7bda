use std::fmt::{self, Display};

/// 张量的二元（或多元）运算符，用于在`TensorError`中指明出错的运算
#[derive(Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    AddAssign,
    Concat,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Self::Add => "相加",
            Self::AddAssign => "自相加",
            Self::Concat => "拼接",
        };
        write!(f, "{operation_name}")
    }
}
