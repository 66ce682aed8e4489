use core::{
    fmt,
    result,
};

use derive_more::Display;

/// Перечисление для возможных ошибок.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Error {
    /// Ошибка форматирования записи.
    #[display("formatting error")]
    Fmt(fmt::Error),

    /// Ожидание блокировки [`crate::ExclusionGuard`] было прервано.
    /// Обращений к регистрам микросхемы при этом не было.
    #[display("interrupted while waiting for the RTC lock")]
    Interrupted,

    /// Задано недопустимое значение аргумента.
    #[display("invalid argument")]
    InvalidArgument,

    /// Во входных данных удалось разобрать только `parsed` полей записи из трёх.
    #[display("malformed input, parsed {parsed} fields out of 3")]
    MalformedInput {
        /// Количество разобранных полей.
        parsed: usize,
    },

    /// Нет атрибута с заданным именем.
    #[display("no such attribute")]
    NotFound,
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error::Fmt(e)
    }
}

/// Тип возвращаемого результата `T` или ошибки [`Error`] ---
/// мономорфизация [`result::Result`] по типу ошибки.
pub type Result<T> = result::Result<T, Error>;
