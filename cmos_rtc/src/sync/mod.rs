/// Примитив взаимного исключения [`ExclusionGuard`].
pub mod exclusion_guard;

/// Источники прерывания ожидания блокировки --- типаж [`Interrupt`].
pub mod interrupt;

pub use exclusion_guard::{
    ExclusionGuard,
    ExclusionToken,
    Stats,
};
pub use interrupt::{
    Interrupt,
    Uninterruptible,
};
