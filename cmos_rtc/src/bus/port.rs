use x86::io;

use super::{
    RegisterAddress,
    RegisterBus,
    RegisterValue,
};

/// Номер порта для выбора адреса в памяти микросхемы RTC.
pub const ADDRESS_PORT: Port = Port(0x0070);

/// Номер порта для обмена данными с памятью микросхемы RTC.
pub const DATA_PORT: Port = Port(0x0071);

/// Восьмибитный
/// [порт ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O)
/// [архитектуры x86-64](https://wiki.osdev.org/X86-64).
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Port(u16);

impl Port {
    /// Создаёт порт ввода--вывода с номером `port`.
    pub const fn new(port: u16) -> Self {
        Self(port)
    }

    /// Функция чтения из текущего порта ввода--вывода.
    ///
    /// # Safety
    ///
    /// Определяется спецификацией порта ввода--вывода.
    unsafe fn read(&self) -> u8 {
        unsafe { io::inb(self.0) }
    }

    /// Функция записи `value` в текущий порт ввода--вывода.
    ///
    /// # Safety
    ///
    /// Определяется спецификацией порта ввода--вывода.
    unsafe fn write(
        &self,
        value: u8,
    ) {
        unsafe {
            io::outb(self.0, value);
        }
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Шина регистров RTC поверх пары
/// [портов ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O)
/// выбора адреса и данных.
#[derive(Debug)]
pub struct PortRegisterBus {
    /// Порт выбора адреса регистра.
    address_port: Port,

    /// Порт данных выбранного регистра.
    data_port: Port,
}

impl PortRegisterBus {
    /// Возвращает шину регистров RTC на стандартных портах
    /// [`ADDRESS_PORT`] и [`DATA_PORT`].
    ///
    /// # Safety
    ///
    /// Вызывающий код должен иметь права на ввод--вывод в эти порты.
    /// Кроме того, никакой другой код не должен обращаться к ним,
    /// иначе выбор адреса одним потоком может быть перезаписан другим.
    pub unsafe fn new() -> Self {
        unsafe { Self::with_ports(ADDRESS_PORT, DATA_PORT) }
    }

    /// Возвращает шину регистров RTC на заданной паре портов.
    /// Порт выбора адреса задаётся параметром `address_port`,
    /// порт данных --- параметром `data_port`.
    ///
    /// # Safety
    ///
    /// См. [`PortRegisterBus::new()`].
    pub unsafe fn with_ports(
        address_port: Port,
        data_port: Port,
    ) -> Self {
        Self {
            address_port,
            data_port,
        }
    }
}

impl RegisterBus for PortRegisterBus {
    fn get(
        &mut self,
        address: RegisterAddress,
    ) -> RegisterValue {
        unsafe {
            self.address_port.write(address.into());
            self.data_port.read()
        }
    }

    fn set(
        &mut self,
        address: RegisterAddress,
        value: RegisterValue,
    ) {
        unsafe {
            self.address_port.write(address.into());
            self.data_port.write(value);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{
        ADDRESS_PORT,
        DATA_PORT,
    };

    #[test]
    fn standard_ports() {
        assert_eq!(u16::from(ADDRESS_PORT), 0x70);
        assert_eq!(u16::from(DATA_PORT), 0x71);
    }
}
