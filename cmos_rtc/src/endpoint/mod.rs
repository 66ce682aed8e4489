use alloc::sync::Arc;

use crate::{
    bus::{
        PortRegisterBus,
        RegisterBus,
    },
    codec::{
        self,
        RecordText,
    },
    error::{
        Error::{
            self,
            Interrupted,
            MalformedInput,
            NotFound,
        },
        Result,
    },
    log::{
        debug,
        error,
        info,
        warn,
    },
    record::{
        Clock,
        FIELD_COUNT,
        RecordKind,
    },
    sync::{
        ExclusionGuard,
        Interrupt,
    },
};

/// Имя директории, в которой внешний код размещает атрибуты устройства.
pub const DIRECTORY: &str = "cmos_rtc";

/// Атрибуты устройства --- по одному на каждый вид записи.
pub static ATTRIBUTES: [Attribute; 2] = [
    Attribute::new("time", 0o660, RecordKind::Time),
    Attribute::new("date", 0o660, RecordKind::Date),
];

/// Описание атрибута устройства --- псевдофайла,
/// через который внешний код читает и пишет одну запись.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Attribute {
    /// Имя псевдофайла.
    name: &'static str,

    /// Права доступа к псевдофайлу.
    mode: u16,

    /// Вид записи, которую обслуживает псевдофайл.
    kind: RecordKind,
}

impl Attribute {
    /// Создаёт описание атрибута.
    const fn new(
        name: &'static str,
        mode: u16,
        kind: RecordKind,
    ) -> Self {
        Self { name, mode, kind }
    }

    /// Имя псевдофайла.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Права доступа к псевдофайлу.
    pub fn mode(&self) -> u16 {
        self.mode
    }

    /// Вид записи, которую обслуживает псевдофайл.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }
}

/// Поведение записи при входных данных, в которых разобрано меньше трёх полей.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WritePolicy {
    /// Запись всё равно выполняется, неразобранные поля записываются нулями.
    /// Вызывающий код узнаёт о проблеме только по количеству разобранных полей.
    #[default]
    Lenient,

    /// Запись отклоняется с ошибкой [`crate::Error::MalformedInput`],
    /// к регистрам микросхемы при этом никто не обращается.
    Strict,
}

/// Точка доступа к одной записи --- чтение и запись её текстового представления.
pub struct RecordEndpoint<B> {
    /// Вид обслуживаемой записи.
    kind: RecordKind,

    /// Доступ к регистрам микросхемы.
    clock: Clock<B>,

    /// Поведение при неполных входных данных.
    policy: WritePolicy,
}

impl<B: RegisterBus> RecordEndpoint<B> {
    /// Создаёт точку доступа к записи вида `kind`.
    pub fn new(
        kind: RecordKind,
        clock: Clock<B>,
        policy: WritePolicy,
    ) -> Self {
        Self {
            kind,
            clock,
            policy,
        }
    }

    /// Вид обслуживаемой записи.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Поведение при неполных входных данных.
    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// Читает запись из микросхемы и возвращает её текст
    /// `hh:mm:ss\n` или `dd/mm/yy\n`.
    pub fn read<I: Interrupt + ?Sized>(
        &self,
        interrupt: &I,
    ) -> Result<RecordText> {
        debug!(kind = %self.kind, "read");

        let record = self.clock.read(self.kind, interrupt).inspect_err(|&e| self.report(e))?;

        codec::format(&record)
    }

    /// Разбирает во входных данных `input` запись и записывает её в микросхему.
    /// Возвращает количество разобранных полей.
    ///
    /// Если разобрано меньше трёх полей, дальнейшее зависит от [`WritePolicy`].
    pub fn write<I: Interrupt + ?Sized>(
        &self,
        input: &[u8],
        interrupt: &I,
    ) -> Result<usize> {
        debug!(kind = %self.kind, len = input.len(), "write");

        let (record, parsed) = codec::parse(self.kind, input);

        if parsed < FIELD_COUNT {
            match self.policy {
                WritePolicy::Lenient => {
                    warn!(kind = %self.kind, parsed, %record, "partial input, writing anyway");
                },
                WritePolicy::Strict => {
                    warn!(kind = %self.kind, parsed, "partial input rejected");
                    return Err(MalformedInput { parsed });
                },
            }
        }

        self.clock.write(&record, interrupt).inspect_err(|&e| self.report(e))?;

        Ok(parsed)
    }

    /// Журналирует ошибку обращения к записи.
    fn report(
        &self,
        e: Error,
    ) {
        if e == Interrupted {
            error!(kind = %self.kind, "interrupted while waiting for the RTC lock");
        } else {
            error!(kind = %self.kind, error = %e, "RTC access failed");
        }
    }
}

/// Устройство
/// [часов реального времени (Real-time clock, RTC)](https://en.wikipedia.org/wiki/Real-time_clock).
///
/// Создаётся один раз при инициализации системы.
/// Владеет общей для обеих записей блокировкой [`ExclusionGuard`]
/// и точками доступа к записям `time` и `date`.
/// Создание и удаление самих псевдофайлов --- забота внешнего кода,
/// который находит точку доступа по имени атрибута с помощью [`CmosRtc::lookup()`].
pub struct CmosRtc<B> {
    /// Точка доступа к записи `time`.
    time: RecordEndpoint<B>,

    /// Точка доступа к записи `date`.
    date: RecordEndpoint<B>,
}

impl<B: RegisterBus> CmosRtc<B> {
    /// Создаёт устройство поверх шины регистров `bus`.
    /// Поведение записи при неполных входных данных задаётся `policy`.
    #[track_caller]
    pub fn new(
        bus: B,
        policy: WritePolicy,
    ) -> Self {
        let clock = Clock::new(Arc::new(ExclusionGuard::new(bus)));

        info!(directory = DIRECTORY, ?policy, "RTC init");

        Self {
            time: RecordEndpoint::new(RecordKind::Time, clock.clone(), policy),
            date: RecordEndpoint::new(RecordKind::Date, clock, policy),
        }
    }

    /// Точка доступа к записи `time`.
    pub fn time(&self) -> &RecordEndpoint<B> {
        &self.time
    }

    /// Точка доступа к записи `date`.
    pub fn date(&self) -> &RecordEndpoint<B> {
        &self.date
    }

    /// Точка доступа к записи вида `kind`.
    pub fn endpoint(
        &self,
        kind: RecordKind,
    ) -> &RecordEndpoint<B> {
        match kind {
            RecordKind::Time => &self.time,
            RecordKind::Date => &self.date,
        }
    }

    /// Находит точку доступа по имени атрибута `name`.
    ///
    /// Возвращает ошибку [`crate::Error::NotFound`], если атрибута с таким именем нет.
    pub fn lookup(
        &self,
        name: &str,
    ) -> Result<&RecordEndpoint<B>> {
        ATTRIBUTES
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| self.endpoint(attribute.kind))
            .ok_or(NotFound)
    }

    /// Атрибуты устройства.
    pub fn attributes(&self) -> &'static [Attribute] {
        &ATTRIBUTES
    }

    /// Доступ к регистрам микросхемы, общий для обеих записей.
    pub fn clock(&self) -> &Clock<B> {
        &self.time.clock
    }
}

impl CmosRtc<PortRegisterBus> {
    /// Создаёт устройство на стандартных
    /// [портах ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O)
    /// микросхемы RTC.
    ///
    /// # Safety
    ///
    /// См. [`PortRegisterBus::new()`].
    #[track_caller]
    pub unsafe fn with_ports(policy: WritePolicy) -> Self {
        Self::new(unsafe { PortRegisterBus::new() }, policy)
    }
}

impl<B> Drop for CmosRtc<B> {
    fn drop(&mut self) {
        info!(directory = DIRECTORY, "RTC exit");
    }
}
