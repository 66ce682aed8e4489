//! Доступ к записям времени и даты микросхемы
//! [часов реального времени (Real-time clock, RTC)](https://en.wikipedia.org/wiki/Real-time_clock),
//! совместимой с [MC146818](https://wiki.osdev.org/CMOS).
//!
//! Показания часов представлены двумя текстовыми записями --- `time` вида `hh:mm:ss`
//! и `date` вида `dd/mm/yy`, которые можно как читать, так и записывать.

#![no_std]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(missing_docs)]

extern crate alloc;

/// Шина регистров микросхемы RTC --- типаж [`RegisterBus`],
/// адреса регистров [`RegisterAddress`] и реализация шины через
/// [порты ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O)
/// [`PortRegisterBus`].
pub mod bus;

/// Перевод записей [`ClockRecord`] в текст и обратно.
pub mod codec;

/// Точки доступа к записям `time` и `date` --- [`RecordEndpoint`],
/// и владеющее ими устройство [`CmosRtc`].
pub mod endpoint;

/// Перечисление для возможных ошибок [`Error`] и соответствующий [`Result`].
pub mod error;

/// Поддержка журналирования макросами библиотеки [`tracing`].
pub mod log;

/// Записи [`ClockRecord`] с показаниями часов и
/// их чтение и запись в микросхему RTC с помощью [`Clock`].
pub mod record;

/// Примитив взаимного исключения [`ExclusionGuard`] с прерываемым захватом.
pub mod sync;

pub use bus::{
    PortRegisterBus,
    RegisterAddress,
    RegisterBus,
    RegisterValue,
};
pub use codec::RECORD_TEXT_LEN;
pub use endpoint::{
    ATTRIBUTES,
    Attribute,
    CmosRtc,
    DIRECTORY,
    RecordEndpoint,
    WritePolicy,
};
pub use error::{
    Error,
    Result,
};
pub use record::{
    Clock,
    ClockRecord,
    RecordKind,
};
pub use sync::{
    ExclusionGuard,
    ExclusionToken,
    Interrupt,
    Uninterruptible,
};
