#[cfg(test)]
mod scanner_tests {
    use sbml::scanner::*;
    use sbml::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let tokens = tokenize(source).expect("source should scan");

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({[,;#]})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::LEFT_BRACKET, "["),
                (TokenType::COMMA, ","),
                (TokenType::SEMICOLON, ";"),
                (TokenType::HASH, "#"),
                (TokenType::RIGHT_BRACKET, "]"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_keywords_and_identifiers() {
        assert_token_sequence(
            "andalso orelse not mod in div print if else while fun True False true x_1",
            &[
                (TokenType::ANDALSO, "andalso"),
                (TokenType::ORELSE, "orelse"),
                (TokenType::NOT, "not"),
                (TokenType::MOD, "mod"),
                (TokenType::IN, "in"),
                (TokenType::DIV, "div"),
                (TokenType::PRINT, "print"),
                (TokenType::IF, "if"),
                (TokenType::ELSE, "else"),
                (TokenType::WHILE, "while"),
                (TokenType::FUN, "fun"),
                (TokenType::TRUE, "True"),
                (TokenType::FALSE, "False"),
                (TokenType::IDENTIFIER, "true"),
                (TokenType::IDENTIFIER, "x_1"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_numbers() {
        let tokens = tokenize("42 2.75 5. 6.02e23 1.0e-2").unwrap();

        assert!(matches!(tokens[0].token_type, TokenType::INTEGER(ref n) if n.to_string() == "42"));
        assert!(matches!(tokens[1].token_type, TokenType::REAL(n) if n == 2.75));
        assert!(matches!(tokens[2].token_type, TokenType::REAL(n) if n == 5.0));
        assert!(matches!(tokens[3].token_type, TokenType::REAL(n) if n == 6.02e23));
        assert!(matches!(tokens[4].token_type, TokenType::REAL(n) if n == 0.01));
        assert_eq!(tokens[3].lexeme, "6.02e23");
    }

    #[test]
    fn test_scanner_04_strings_with_either_quote() {
        let tokens = tokenize(r#"'single' "double" "it's""#).unwrap();

        let decoded: Vec<&str> = tokens
            .iter()
            .filter_map(|t| match &t.token_type {
                TokenType::STRING(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(decoded, vec!["single", "double", "it's"]);
        assert_eq!(tokens[0].lexeme, "'single'");
    }

    #[test]
    fn test_scanner_05_operators() {
        assert_token_sequence(
            "a**b::c<>d<=e>=f==g=h-i/j*k+l<m>n",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::STAR_STAR, "**"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::COLON_COLON, "::"),
                (TokenType::IDENTIFIER, "c"),
                (TokenType::LESS_GREATER, "<>"),
                (TokenType::IDENTIFIER, "d"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::IDENTIFIER, "e"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::IDENTIFIER, "f"),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::IDENTIFIER, "g"),
                (TokenType::EQUAL, "="),
                (TokenType::IDENTIFIER, "h"),
                (TokenType::MINUS, "-"),
                (TokenType::IDENTIFIER, "i"),
                (TokenType::SLASH, "/"),
                (TokenType::IDENTIFIER, "j"),
                (TokenType::STAR, "*"),
                (TokenType::IDENTIFIER, "k"),
                (TokenType::PLUS, "+"),
                (TokenType::IDENTIFIER, "l"),
                (TokenType::LESS, "<"),
                (TokenType::IDENTIFIER, "m"),
                (TokenType::GREATER, ">"),
                (TokenType::IDENTIFIER, "n"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_unexpected_chars_halt_scanning() {
        let source = ",;$(@";
        let scanner = Scanner::new(source);

        let results: Vec<_> = scanner.collect();

        // 0: COMMA ','
        // 1: SEMICOLON ';'
        // 2: Error for '$', nothing after it
        assert_eq!(results.len(), 3, "Expected scanning to stop at the first error");
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());

        let err = results[2].as_ref().unwrap_err();
        assert!(err.is_syntax());
        assert!(
            err.to_string().contains("Unexpected character: $"),
            "got: {}",
            err
        );

        assert!(tokenize(source).is_err());
    }

    #[test]
    fn test_unterminated_string() {
        assert!(tokenize("'abc").unwrap_err().is_syntax());
        assert!(tokenize("\"abc\ndef\"").unwrap_err().is_syntax());
    }
}
