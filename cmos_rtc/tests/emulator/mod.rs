#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        Mutex,
    },
    thread::{
        self,
        ThreadId,
    },
};

use tracing_core::LevelFilter;
use tracing_subscriber::{
    self,
    EnvFilter,
    fmt,
};

use cmos_rtc::{
    RecordKind,
    RegisterAddress,
    RegisterBus,
    RegisterValue,
};

/// Размер эмулируемой памяти микросхемы.
pub const REGISTER_COUNT: usize = 0x80;

/// Одно обращение к шине.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    Get(RegisterAddress),
    Set(RegisterAddress, RegisterValue),
}

impl Access {
    pub fn address(&self) -> RegisterAddress {
        match *self {
            Access::Get(address) | Access::Set(address, _) => address,
        }
    }

    pub fn is_get(&self) -> bool {
        matches!(self, Access::Get(_))
    }
}

/// Обращение к шине вместе с потоком, который его выполнил.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Entry {
    pub thread: ThreadId,
    pub access: Access,
}

/// Журнал обращений к шине, общий для теста и эмулятора.
#[derive(Debug, Default)]
pub struct Journal(Mutex<Vec<Entry>>);

impl Journal {
    pub fn entries(&self) -> Vec<Entry> {
        self.0.lock().unwrap().clone()
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.entries().into_iter().map(|entry| entry.access).collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    fn push(
        &self,
        access: Access,
    ) {
        self.0.lock().unwrap().push(Entry {
            thread: thread::current().id(),
            access,
        });
    }

    /// Проверяет, что журнал разбивается на непрерывные тройки обращений,
    /// каждая из которых целиком читает или пишет одну запись из одного потока.
    /// Возвращает количество троек.
    pub fn validate_records(&self) -> usize {
        let entries = self.entries();
        assert_eq!(entries.len() % 3, 0, "journal is not made of triples");

        for (i, triple) in entries.chunks(3).enumerate() {
            let thread = triple[0].thread;
            let is_get = triple[0].access.is_get();
            let addresses: Vec<_> = triple.iter().map(|entry| entry.access.address()).collect();

            assert!(
                triple.iter().all(|entry| entry.thread == thread),
                "triple #{i} mixes accesses from different threads: {triple:?}",
            );
            assert!(
                triple.iter().all(|entry| entry.access.is_get() == is_get),
                "triple #{i} mixes reads and writes: {triple:?}",
            );
            assert!(
                enum_iterator::all::<RecordKind>().any(|kind| kind.layout() == &addresses[..]),
                "triple #{i} does not match any record layout: {triple:?}",
            );
        }

        entries.len() / 3
    }
}

/// Эмуляция микросхемы RTC, которая записывает все обращения в [`Journal`].
pub struct EmulatedBus {
    registers: [RegisterValue; REGISTER_COUNT],
    journal: Arc<Journal>,
    yield_on_access: bool,
}

impl EmulatedBus {
    pub fn new() -> (Self, Arc<Journal>) {
        let journal = Arc::new(Journal::default());
        let bus = Self {
            registers: [0; REGISTER_COUNT],
            journal: journal.clone(),
            yield_on_access: false,
        };

        (bus, journal)
    }

    /// Эмулятор, который уступает процессор при каждом обращении,
    /// чтобы спровоцировать перемешивание обращений разных потоков.
    pub fn yielding() -> (Self, Arc<Journal>) {
        let (mut bus, journal) = Self::new();
        bus.yield_on_access = true;
        (bus, journal)
    }

    pub fn with_registers(
        mut self,
        values: &[(RegisterAddress, RegisterValue)],
    ) -> Self {
        for &(address, value) in values {
            self.registers[usize::from(u8::from(address))] = value;
        }
        self
    }

    pub fn register(
        &self,
        address: RegisterAddress,
    ) -> RegisterValue {
        self.registers[usize::from(u8::from(address))]
    }

    fn access(
        &self,
        access: Access,
    ) {
        self.journal.push(access);
        if self.yield_on_access {
            thread::yield_now();
        }
    }
}

impl RegisterBus for EmulatedBus {
    fn get(
        &mut self,
        address: RegisterAddress,
    ) -> RegisterValue {
        self.access(Access::Get(address));
        self.register(address)
    }

    fn set(
        &mut self,
        address: RegisterAddress,
        value: RegisterValue,
    ) {
        self.access(Access::Set(address, value));
        self.registers[usize::from(u8::from(address))] = value;
    }
}

pub fn init_log() {
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::DEBUG.into());

    let format = fmt::format()
        .with_level(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(true)
        .compact();

    tracing_subscriber::fmt()
        .with_ansi(false)
        .event_format(format)
        .with_env_filter(filter)
        .init();
}
