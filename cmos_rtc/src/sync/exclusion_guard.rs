use core::{
    fmt,
    hint,
    ops::{
        Deref,
        DerefMut,
    },
    panic::Location,
    sync::atomic::{
        AtomicUsize,
        Ordering,
    },
};

use crate::{
    error::{
        Error::Interrupted,
        Result,
    },
    log::trace,
};

use super::Interrupt;

/// Блокировка, которая владеет шиной регистров RTC `B` и
/// сериализует все обращения к ней.
///
/// Одна запись часов занимает три регистра.
/// Чтобы чтение или запись записи целиком не перемешались с
/// обращениями других потоков исполнения, вся последовательность
/// выполняется под одним захватом [`ExclusionGuard`].
/// Блокировка одна на устройство: её делят и записи `time` и `date`,
/// и обращения к отдельным регистрам.
///
/// Ожидание освобождения блокировки можно прервать, см. [`Interrupt`].
///
/// # Examples
///
/// ```rust
/// # use core::sync::atomic::AtomicBool;
/// # use cmos_rtc::{Error, ExclusionGuard, Uninterruptible};
/// #
/// let guard = ExclusionGuard::new(0_u8);
///
/// let mut token = guard.acquire_interruptible(&Uninterruptible).unwrap();
/// *token += 1;
///
/// // Пока блокировка захвачена, ожидание с выставленным флагом прерывания
/// // заканчивается ошибкой.
/// let interrupt = AtomicBool::new(true);
/// assert_eq!(guard.acquire_interruptible(&interrupt).err(), Some(Error::Interrupted));
///
/// ExclusionGuard::release(token);
/// assert_eq!(*guard.acquire_interruptible(&interrupt).unwrap(), 1);
/// ```
pub struct ExclusionGuard<B> {
    /// Защищаемая шина регистров.
    bus: spin::Mutex<B>,

    /// Место кода, в котором создана блокировка.
    /// Используется для отладочной печати.
    defined: &'static Location<'static>,

    /// Статистика захватов блокировки.
    stats: Stats,
}

impl<B> ExclusionGuard<B> {
    /// Создаёт новую блокировку для защиты шины `bus`.
    #[track_caller]
    pub fn new(bus: B) -> Self {
        Self {
            bus: spin::Mutex::new(bus),
            defined: Location::caller(),
            stats: Stats::new(),
        }
    }

    /// Захватывает блокировку.
    /// При этом ожидает в активном цикле освобождения блокировки, если она уже захвачена.
    ///
    /// После каждой неудачной попытки захвата проверяет `interrupt`.
    /// Если ожидание нужно прервать, возвращает ошибку [`crate::Error::Interrupted`],
    /// блокировка при этом не захватывается.
    ///
    /// Возвращает [`ExclusionToken`], который:
    ///   - Даёт доступ к шине с помощью типажей [`Deref`] и [`DerefMut`].
    ///   - Автоматически освобождает блокировку в реализации типажа [`Drop`].
    pub fn acquire_interruptible<I: Interrupt + ?Sized>(
        &self,
        interrupt: &I,
    ) -> Result<ExclusionToken<'_, B>> {
        loop {
            if let Some(token) = self.try_acquire() {
                return Ok(token);
            }

            if interrupt.is_pending() {
                self.stats.interruptions.fetch_add(1, Ordering::Relaxed);
                trace!(guard = %self.defined, "interrupted while waiting");
                return Err(Interrupted);
            }

            self.stats.waits.fetch_add(1, Ordering::Relaxed);
            hint::spin_loop();
        }
    }

    /// Пытается захватить блокировку.
    /// Если она уже захвачена, возвращает [`None`].
    pub fn try_acquire(&self) -> Option<ExclusionToken<'_, B>> {
        let bus = self.bus.try_lock()?;
        self.stats.locks.fetch_add(1, Ordering::Relaxed);

        Some(ExclusionToken {
            bus,
            stats: &self.stats,
        })
    }

    /// Освобождает блокировку, захваченную `token`.
    /// Эквивалентно удалению `token`.
    pub fn release(token: ExclusionToken<'_, B>) {
        drop(token);
    }

    /// Возвращает `true`, если блокировка захвачена.
    pub fn is_held(&self) -> bool {
        self.bus.is_locked()
    }

    /// Даёт доступ к шине без блокирования в случае,
    /// если вызывающий код эксклюзивно владеет [`ExclusionGuard`] --- `&mut self`.
    pub fn get_mut(&mut self) -> &mut B {
        self.bus.get_mut()
    }

    /// Статистика захватов блокировки.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}

impl<B> fmt::Debug for ExclusionGuard<B> {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(
            formatter,
            "ExclusionGuard {{ defined: {}, held: {}, stats: {:?} }}",
            self.defined,
            self.is_held(),
            self.stats,
        )
    }
}

impl<B> Drop for ExclusionGuard<B> {
    fn drop(&mut self) {
        assert_eq!(self.stats.locks(), self.stats.unlocks());
        trace!(guard = %self.defined, stats = ?self.stats, "dropping");
    }
}

/// Захваченный [`ExclusionGuard`].
///
/// - Даёт доступ к шине с помощью типажей [`Deref`] и [`DerefMut`].
/// - Автоматически освобождает блокировку в реализации типажа [`Drop`].
pub struct ExclusionToken<'a, B> {
    /// Захваченная шина.
    bus: spin::MutexGuard<'a, B>,

    /// Статистика захватов блокировки, которой принадлежит токен.
    stats: &'a Stats,
}

impl<B> Deref for ExclusionToken<'_, B> {
    type Target = B;

    fn deref(&self) -> &Self::Target {
        self.bus.deref()
    }
}

impl<B> DerefMut for ExclusionToken<'_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.bus.deref_mut()
    }
}

impl<B> Drop for ExclusionToken<'_, B> {
    fn drop(&mut self) {
        self.stats.unlocks.fetch_add(1, Ordering::Relaxed);
    }
}

impl<B: fmt::Debug> fmt::Debug for ExclusionToken<'_, B> {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(formatter, "{:?}", self.deref())
    }
}

/// Статистика захватов и ожиданий освобождения [`ExclusionGuard`].
#[derive(Debug)]
pub struct Stats {
    /// Количество прерванных ожиданий.
    interruptions: AtomicUsize,

    /// Количество успешных захватов --- заходов в критическую секцию.
    locks: AtomicUsize,

    /// Количество освобождений --- выходов из критической секции.
    unlocks: AtomicUsize,

    /// Количество итераций цикла ожидания на уже захваченной блокировке.
    waits: AtomicUsize,
}

impl Stats {
    /// Инициализирует статистику.
    const fn new() -> Self {
        Self {
            interruptions: AtomicUsize::new(0),
            locks: AtomicUsize::new(0),
            unlocks: AtomicUsize::new(0),
            waits: AtomicUsize::new(0),
        }
    }

    /// Количество прерванных ожиданий.
    pub fn interruptions(&self) -> usize {
        self.interruptions.load(Ordering::Relaxed)
    }

    /// Количество успешных захватов.
    pub fn locks(&self) -> usize {
        self.locks.load(Ordering::Relaxed)
    }

    /// Количество освобождений.
    pub fn unlocks(&self) -> usize {
        self.unlocks.load(Ordering::Relaxed)
    }

    /// Количество итераций цикла ожидания.
    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod test {
    use core::sync::atomic::AtomicBool;

    use super::ExclusionGuard;
    use crate::{
        error::Error,
        sync::Uninterruptible,
    };

    #[test]
    fn acquire_release() {
        let guard = ExclusionGuard::new(0);

        let mut token = guard.acquire_interruptible(&Uninterruptible).unwrap();
        *token += 1;
        assert!(guard.is_held());
        assert!(guard.try_acquire().is_none());

        ExclusionGuard::release(token);
        assert!(!guard.is_held());

        assert_eq!(*guard.try_acquire().unwrap(), 1);
        assert_eq!(guard.stats().locks(), 2);
        assert_eq!(guard.stats().unlocks(), 2);
    }

    #[test]
    fn interrupted() {
        let guard = ExclusionGuard::new(());
        let interrupt = AtomicBool::new(true);

        let token = guard.try_acquire().unwrap();
        assert_eq!(
            guard.acquire_interruptible(&interrupt).err(),
            Some(Error::Interrupted),
        );
        assert_eq!(guard.stats().interruptions(), 1);
        drop(token);

        assert!(guard.acquire_interruptible(&interrupt).is_ok());
        assert_eq!(guard.stats().locks(), 2);
    }

    #[test]
    fn exclusive_access() {
        let mut guard = ExclusionGuard::new(41);
        *guard.get_mut() += 1;
        assert_eq!(*guard.try_acquire().unwrap(), 42);
    }
}
