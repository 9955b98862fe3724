#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|code: &str| {
    let Ok(tokens) = plc::lex(code) else { return };
    let chars = code.chars().collect::<Vec<_>>();

    for token in &tokens {
        let literal = chars[token.offset..token.end_offset()].iter().collect::<String>();
        assert_eq!(literal, token.literal);
    }

    if let Err(e) = plc::parse(&tokens) {
        assert!(e.offset <= chars.len());
    }
});
