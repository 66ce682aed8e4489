use core::sync::atomic::{
    AtomicBool,
    Ordering,
};

/// Источник прерывания ожидания.
///
/// Пока поток исполнения ждёт освобождения [`crate::ExclusionGuard`],
/// он периодически проверяет, не пришёл ли ему сигнал прерывания.
/// Если пришёл, ожидание прекращается с ошибкой [`crate::Error::Interrupted`].
/// Так заблокированное обращение к часам не делает поток неубиваемым.
pub trait Interrupt {
    /// Возвращает `true`, если ожидание нужно прервать.
    fn is_pending(&self) -> bool;
}

/// Флаг, который выставляет другой поток исполнения, чтобы прервать ожидание.
impl Interrupt for AtomicBool {
    fn is_pending(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: Interrupt + ?Sized> Interrupt for &T {
    fn is_pending(&self) -> bool {
        (**self).is_pending()
    }
}

/// Источник прерываний, который никогда не прерывает ожидание.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uninterruptible;

impl Interrupt for Uninterruptible {
    fn is_pending(&self) -> bool {
        false
    }
}
