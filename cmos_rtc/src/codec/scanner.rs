/// Курсор по входным данным для разбора записей в духе `sscanf()`.
pub(super) struct Scanner<'a> {
    /// Входные данные.
    input: &'a [u8],

    /// Позиция первого неразобранного байта.
    position: usize,
}

impl<'a> Scanner<'a> {
    /// Создаёт курсор в начале `input`.
    pub(super) fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Пропускает пробельные символы.
    pub(super) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|x| x.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    /// Если очередной символ равен `expected`, пропускает его и возвращает `true`.
    /// Иначе возвращает `false` и не двигает курсор.
    pub(super) fn literal(
        &mut self,
        expected: char,
    ) -> bool {
        if self.peek().is_some_and(|x| char::from(x) == expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Разбирает от одной до `max_digits` шестнадцатеричных цифр.
    /// Возвращает [`None`], если очередной символ не является шестнадцатеричной цифрой.
    pub(super) fn hex(
        &mut self,
        max_digits: usize,
    ) -> Option<u8> {
        let mut value: Option<u8> = None;

        for _ in 0 .. max_digits {
            let Some(digit) = self.peek().and_then(|x| char::from(x).to_digit(16)) else {
                break;
            };

            value = Some((value.unwrap_or(0) << 4) | digit as u8);
            self.position += 1;
        }

        value
    }

    /// Очередной байт входных данных.
    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }
}

#[cfg(test)]
mod test {
    use super::Scanner;

    #[test]
    fn hex_width() {
        let mut scanner = Scanner::new(b"abc");
        assert_eq!(scanner.hex(2), Some(0xAB));
        assert_eq!(scanner.hex(2), Some(0x0C));
        assert_eq!(scanner.hex(2), None);
    }

    #[test]
    fn literal() {
        let mut scanner = Scanner::new(b" :");
        assert!(!scanner.literal(':'));
        scanner.skip_whitespace();
        assert!(scanner.literal(':'));
        assert!(!scanner.literal(':'));
    }
}
