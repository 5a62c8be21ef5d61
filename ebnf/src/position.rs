/// A human-facing position within a grammar source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location<'a> {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
    /// The full text of the line, without its line terminator.
    pub text: &'a str,
}

impl<'a> Location<'a> {
    /// Find the line containing byte `offset` by walking newline-delimited
    /// spans. An offset sitting on a newline (or at the end of the input)
    /// belongs to the line it terminates.
    pub fn locate(src: &'a str, offset: usize) -> Self {
        let mut start = 0;
        let mut last = Location {
            line: 1,
            column: 1,
            text: "",
        };

        for (idx, line) in src.split('\n').enumerate() {
            let text = line.strip_suffix('\r').unwrap_or(line);
            let column = match line.get(..offset.saturating_sub(start)) {
                Some(prefix) => prefix.chars().count() + 1,
                None => text.chars().count() + 1,
            };
            last = Location {
                line: idx + 1,
                column,
                text,
            };
            if offset <= start + line.len() {
                break;
            }
            start += line.len() + 1;
        }

        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_simple() {
        let src = "<a> ::= 'x'\n<b> ::= 'y'\n";
        let tests = vec![
            (0, 1, 1, "<a> ::= 'x'"),
            (4, 1, 5, "<a> ::= 'x'"),
            (11, 1, 12, "<a> ::= 'x'"),
            (12, 2, 1, "<b> ::= 'y'"),
            (20, 2, 9, "<b> ::= 'y'"),
            (24, 3, 1, ""),
        ];
        for test in tests {
            let got = Location::locate(src, test.0);
            assert_eq!(
                got,
                Location {
                    line: test.1,
                    column: test.2,
                    text: test.3
                },
                "test case: {:?}",
                test
            );
        }
    }

    #[test]
    fn locate_counts_characters() {
        let src = "<é> ::= 'ü' |";
        // '|' sits at byte 14 but is the 13th character.
        let got = Location::locate(src, 14);
        assert_eq!(got.column, 13);
        assert_eq!(got.line, 1);
    }

    #[test]
    fn locate_crlf() {
        let src = "<a> ::= 'x'\r\n<b> ::= 'y'";
        let got = Location::locate(src, 13);
        assert_eq!(got.line, 2);
        assert_eq!(got.column, 1);
        assert_eq!(got.text, "<b> ::= 'y'");
    }
}
