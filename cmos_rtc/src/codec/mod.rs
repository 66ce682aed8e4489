/// Посимвольный разбор входных данных --- [`Scanner`].
mod scanner;

use core::fmt::Write;

use heapless::String;
use static_assertions::const_assert_eq;

use crate::{
    error::Result,
    record::{
        ClockRecord,
        FIELD_COUNT,
        RecordKind,
    },
};

use scanner::Scanner;

/// Длина текстового представления записи `hh:mm:ss\n` или `dd/mm/yy\n`.
pub const RECORD_TEXT_LEN: usize = FIELD_COUNT * FIELD_WIDTH + (FIELD_COUNT - 1) + 1;

const_assert_eq!(RECORD_TEXT_LEN, 9);

/// Количество шестнадцатеричных цифр в одном поле записи.
const FIELD_WIDTH: usize = 2;

/// Текстовое представление записи.
pub type RecordText = String<RECORD_TEXT_LEN>;

/// Переводит `record` в текст `hh:mm:ss\n` для времени или `dd/mm/yy\n` для даты.
/// Каждое поле печатается ровно двумя строчными шестнадцатеричными цифрами.
pub fn format(record: &ClockRecord) -> Result<RecordText> {
    let mut text = RecordText::new();
    writeln!(text, "{record}")?;
    Ok(text)
}

/// Переводит запись времени `record` в текст `hh:mm:ss\n`.
pub fn format_time(record: &ClockRecord) -> Result<RecordText> {
    debug_assert_eq!(record.kind(), RecordKind::Time);
    format(record)
}

/// Переводит запись даты `record` в текст `dd/mm/yy\n`.
pub fn format_date(record: &ClockRecord) -> Result<RecordText> {
    debug_assert_eq!(record.kind(), RecordKind::Date);
    format(record)
}

/// Разбирает во входных данных `input` запись вида `kind`.
///
/// Разбор повторяет `sscanf(input, "%02x:%02x:%02x")` для времени и
/// `sscanf(input, "%02x/%02x/%02x")` для даты:
///   - Перед каждым полем пропускаются пробельные символы.
///   - Поле --- одна или две шестнадцатеричные цифры в любом регистре.
///   - Между полями должен стоять разделитель [`RecordKind::separator()`].
///   - Данные после третьего поля игнорируются.
///
/// Разбор останавливается на первом несовпадении.
/// Возвращает запись и количество разобранных полей от `0` до `3`.
/// Неразобранные поля записи остаются нулевыми.
///
/// Допустимость значений не проверяется, месяц `99` будет принят как есть.
pub fn parse(
    kind: RecordKind,
    input: &[u8],
) -> (ClockRecord, usize) {
    let mut record = ClockRecord::new(kind);
    let mut scanner = Scanner::new(input);
    let mut parsed = 0;

    for (i, field) in record.fields_mut().iter_mut().enumerate() {
        if i > 0 && !scanner.literal(kind.separator()) {
            break;
        }

        scanner.skip_whitespace();

        match scanner.hex(FIELD_WIDTH) {
            Some(value) => {
                *field = value;
                parsed += 1;
            },
            None => break,
        }
    }

    (record, parsed)
}

/// Разбирает во входных данных `input` запись времени `hh:mm:ss`, см. [`parse()`].
pub fn parse_time(input: &[u8]) -> (ClockRecord, usize) {
    parse(RecordKind::Time, input)
}

/// Разбирает во входных данных `input` запись даты `dd/mm/yy`, см. [`parse()`].
pub fn parse_date(input: &[u8]) -> (ClockRecord, usize) {
    parse(RecordKind::Date, input)
}
