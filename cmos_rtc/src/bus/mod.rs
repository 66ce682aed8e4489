/// [Порты ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O)
/// [`Port`] и шина регистров RTC поверх них --- [`PortRegisterBus`].
mod port;

use num_enum::{
    IntoPrimitive,
    TryFromPrimitive,
};
use static_assertions::const_assert;

use crate::error::{
    Error::InvalidArgument,
    Result,
};

pub use port::{
    ADDRESS_PORT,
    DATA_PORT,
    Port,
    PortRegisterBus,
};

/// Значение регистра микросхемы RTC.
///
/// Микросхема хранит поля даты и времени в
/// [двоично--десятичном формате](https://en.wikipedia.org/wiki/Binary-coded_decimal).
/// Значение никогда не переводится в двоичный формат и
/// передаётся в текстовое представление и обратно как есть.
pub type RegisterValue = u8;

/// Адрес регистра во внутренней памяти микросхемы RTC.
///
/// Адрес не имеет отношения к основной памяти компьютера,
/// он адресует внутреннюю память микросхемы RTC.
#[derive(Clone, Copy, Debug, Eq, IntoPrimitive, Ord, PartialEq, PartialOrd, TryFromPrimitive)]
#[repr(u8)]
pub enum RegisterAddress {
    /// Секунды, `00`--`59`.
    Second = 0x00,

    /// Минуты, `00`--`59`.
    Minute = 0x02,

    /// Часы, `00`--`23`.
    Hour = 0x04,

    /// День недели, `01`--`07`.
    /// Записями [`crate::ClockRecord`] не используется.
    DayOfWeek = 0x06,

    /// День месяца, `01`--`31`.
    Day = 0x07,

    /// Месяц, `01`--`12`.
    Month = 0x08,

    /// Год внутри века, `00`--`99`.
    Year = 0x09,
}

const_assert!(RegisterAddress::Year as u8 == LAST_CLOCK_REGISTER);

impl RegisterAddress {
    /// Переводит байт `address` в адрес регистра.
    ///
    /// Возвращает ошибку [`crate::Error::InvalidArgument`],
    /// если по адресу `address` нет регистра даты или времени.
    pub fn new(address: u8) -> Result<Self> {
        Self::try_from(address).map_err(|_| InvalidArgument)
    }
}

/// Типаж шины регистров микросхемы RTC.
/// При обращении к регистру его адрес записывается в порт выбора адреса,
/// а данные записываются или читаются из порта данных.
///
/// Шина сама по себе ничего не блокирует.
/// Последовательность обращений к ней защищает [`crate::ExclusionGuard`],
/// который владеет шиной и выдаёт доступ к ней только при захваченной блокировке.
///
/// Типаж используется для того, чтобы в тестах можно было создать эмуляцию микросхемы.
/// В обычном же режиме используется реализация [`PortRegisterBus`],
/// которая работает с настоящими портами ввода--вывода.
pub trait RegisterBus {
    /// Читает значение регистра `address`.
    fn get(
        &mut self,
        address: RegisterAddress,
    ) -> RegisterValue;

    /// Записывает `value` в регистр `address`.
    fn set(
        &mut self,
        address: RegisterAddress,
        value: RegisterValue,
    );
}

/// Адрес последнего регистра даты и времени в памяти RTC.
const LAST_CLOCK_REGISTER: u8 = 0x09;

#[cfg(test)]
mod test {
    use super::RegisterAddress;

    #[test]
    fn register_layout() {
        assert_eq!(u8::from(RegisterAddress::Second), 0x00);
        assert_eq!(u8::from(RegisterAddress::Minute), 0x02);
        assert_eq!(u8::from(RegisterAddress::Hour), 0x04);
        assert_eq!(u8::from(RegisterAddress::DayOfWeek), 0x06);
        assert_eq!(u8::from(RegisterAddress::Day), 0x07);
        assert_eq!(u8::from(RegisterAddress::Month), 0x08);
        assert_eq!(u8::from(RegisterAddress::Year), 0x09);
    }

    #[test]
    fn register_from_byte() {
        assert_eq!(RegisterAddress::new(0x04), Ok(RegisterAddress::Hour));
        assert_eq!(RegisterAddress::new(0x09), Ok(RegisterAddress::Year));
        assert!(RegisterAddress::new(0x01).is_err());
        assert!(RegisterAddress::new(0x0A).is_err());
        assert!(RegisterAddress::new(0xFF).is_err());
    }
}
