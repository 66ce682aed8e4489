use alloc::sync::Arc;
use core::fmt;

use derive_more::Display;
use enum_iterator::Sequence;

use crate::{
    bus::{
        RegisterAddress,
        RegisterBus,
        RegisterValue,
    },
    error::Result,
    log::trace,
    sync::{
        ExclusionGuard,
        Interrupt,
    },
};

/// Количество полей в одной записи.
pub const FIELD_COUNT: usize = 3;

/// Вид записи часов.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Sequence)]
pub enum RecordKind {
    /// Время --- часы, минуты и секунды.
    #[display("time")]
    Time,

    /// Дата --- день месяца, месяц и год внутри века.
    #[display("date")]
    Date,
}

impl RecordKind {
    /// Регистры, в которых хранятся поля записи, в порядке полей.
    /// Поле записи номер `i` хранится в регистре `layout()[i]`.
    /// В этом же порядке регистры читаются и записываются.
    pub const fn layout(&self) -> &'static [RegisterAddress; FIELD_COUNT] {
        match self {
            RecordKind::Time => &[
                RegisterAddress::Hour,
                RegisterAddress::Minute,
                RegisterAddress::Second,
            ],
            RecordKind::Date => &[
                RegisterAddress::Day,
                RegisterAddress::Month,
                RegisterAddress::Year,
            ],
        }
    }

    /// Разделитель полей записи в текстовом представлении.
    pub const fn separator(&self) -> char {
        match self {
            RecordKind::Time => ':',
            RecordKind::Date => '/',
        }
    }
}

/// Запись часов --- три поля одного вида [`RecordKind`].
///
/// Запись создаётся на время одного запроса и сразу же используется.
/// Источником истины о показаниях часов остаются регистры микросхемы.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClockRecord {
    /// Вид записи.
    kind: RecordKind,

    /// Значения полей в порядке [`RecordKind::layout()`].
    fields: [RegisterValue; FIELD_COUNT],
}

impl ClockRecord {
    /// Создаёт запись вида `kind` с нулевыми полями.
    pub const fn new(kind: RecordKind) -> Self {
        Self::with_fields(kind, [0; FIELD_COUNT])
    }

    /// Создаёт запись вида `kind` с полями `fields`.
    pub const fn with_fields(
        kind: RecordKind,
        fields: [RegisterValue; FIELD_COUNT],
    ) -> Self {
        Self { kind, fields }
    }

    /// Создаёт запись времени.
    pub const fn time(
        hour: RegisterValue,
        minute: RegisterValue,
        second: RegisterValue,
    ) -> Self {
        Self::with_fields(RecordKind::Time, [hour, minute, second])
    }

    /// Создаёт запись даты.
    pub const fn date(
        day: RegisterValue,
        month: RegisterValue,
        year: RegisterValue,
    ) -> Self {
        Self::with_fields(RecordKind::Date, [day, month, year])
    }

    /// Вид записи.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Значения полей в порядке [`RecordKind::layout()`].
    pub fn fields(&self) -> &[RegisterValue; FIELD_COUNT] {
        &self.fields
    }

    /// Изменяемые значения полей в порядке [`RecordKind::layout()`].
    pub fn fields_mut(&mut self) -> &mut [RegisterValue; FIELD_COUNT] {
        &mut self.fields
    }

    /// Возвращает значение поля, которое хранится в регистре `address`,
    /// или [`None`], если у записи нет такого поля.
    pub fn get(
        &self,
        address: RegisterAddress,
    ) -> Option<RegisterValue> {
        self.kind
            .layout()
            .iter()
            .position(|&x| x == address)
            .map(|i| self.fields[i])
    }
}

/// Каждое поле печатается ровно двумя шестнадцатеричными цифрами.
/// Двоично--десятичные значения регистров при этом выглядят как десятичные.
impl fmt::Display for ClockRecord {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        let separator = self.kind.separator();
        let [a, b, c] = self.fields;
        write!(formatter, "{a:02x}{separator}{b:02x}{separator}{c:02x}")
    }
}

/// Чтение и запись записей [`ClockRecord`] в микросхему RTC.
///
/// Все обращения к шине идут через общую на устройство блокировку [`ExclusionGuard`].
/// Поэтому три регистра одной записи читаются или пишутся без
/// перемешивания с обращениями других потоков исполнения.
pub struct Clock<B> {
    /// Блокировка, владеющая шиной регистров.
    guard: Arc<ExclusionGuard<B>>,
}

impl<B: RegisterBus> Clock<B> {
    /// Создаёт [`Clock`] поверх общей блокировки `guard`.
    pub fn new(guard: Arc<ExclusionGuard<B>>) -> Self {
        Self { guard }
    }

    /// Читает запись вида `kind`.
    ///
    /// Если ожидание блокировки прервано через `interrupt`,
    /// возвращает [`crate::Error::Interrupted`] не обращаясь к шине.
    pub fn read<I: Interrupt + ?Sized>(
        &self,
        kind: RecordKind,
        interrupt: &I,
    ) -> Result<ClockRecord> {
        let mut record = ClockRecord::new(kind);

        {
            let mut bus = self.guard.acquire_interruptible(interrupt)?;
            for (field, &address) in record.fields.iter_mut().zip(kind.layout()) {
                *field = bus.get(address);
            }
        }

        trace!(%record, "read");

        Ok(record)
    }

    /// Записывает `record` в регистры его вида.
    /// Записанные значения не перечитываются.
    ///
    /// Если ожидание блокировки прервано через `interrupt`,
    /// возвращает [`crate::Error::Interrupted`] не обращаясь к шине.
    pub fn write<I: Interrupt + ?Sized>(
        &self,
        record: &ClockRecord,
        interrupt: &I,
    ) -> Result<()> {
        {
            let mut bus = self.guard.acquire_interruptible(interrupt)?;
            for (&value, &address) in record.fields.iter().zip(record.kind.layout()) {
                bus.set(address, value);
            }
        }

        trace!(%record, "written");

        Ok(())
    }

    /// Читает отдельный регистр `address` под той же блокировкой.
    pub fn get<I: Interrupt + ?Sized>(
        &self,
        address: RegisterAddress,
        interrupt: &I,
    ) -> Result<RegisterValue> {
        Ok(self.guard.acquire_interruptible(interrupt)?.get(address))
    }

    /// Записывает `value` в отдельный регистр `address` под той же блокировкой.
    pub fn set<I: Interrupt + ?Sized>(
        &self,
        address: RegisterAddress,
        value: RegisterValue,
        interrupt: &I,
    ) -> Result<()> {
        self.guard.acquire_interruptible(interrupt)?.set(address, value);
        Ok(())
    }

    /// Общая блокировка, владеющая шиной регистров.
    pub fn guard(&self) -> &Arc<ExclusionGuard<B>> {
        &self.guard
    }
}

impl<B> Clone for Clock<B> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
        }
    }
}

impl<B> fmt::Debug for Clock<B> {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(formatter, "Clock {{ guard: {:?} }}", self.guard)
    }
}
