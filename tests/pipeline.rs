use hlex::codegen::reload;
use hlex::{GenerateError, Generator, ScanError};

fn generator(rules: &str) -> Generator {
  Generator::new(rules).unwrap()
}

fn scan<'a>(generator: &'a Generator, input: &'a str) -> Result<Vec<(&'a str, &'a str)>, ScanError> {
  generator
      .tokenize(input)
      .map(|tokens| tokens.iter().map(|token| (token.tag, token.text)).collect())
}

#[test]
fn table_is_deterministic() {
  let generator = generator("A: ab|ac|a[b-d]x$ B: [a-c]+$ C: .$");
  let table = generator.table();
  for state in 0..table.len() as u32 {
    let edges = table.edges(state);
    assert!(edges.iter().all(|edge| edge.lo <= edge.hi));
    assert!(edges.windows(2).all(|pair| pair[0].hi < pair[1].lo));
  }
}

#[test]
fn maximal_munch() {
  let generator = generator("A: a$ B: ab$");
  assert_eq!(scan(&generator, "ab").unwrap(), vec![("B", "ab")]);
}

#[test]
fn backtracking() {
  let generator = generator("A: a$ B: b$");
  assert_eq!(scan(&generator, "ab").unwrap(), vec![("A", "a"), ("B", "b")]);
}

#[test]
fn rollback_to_last_accept() {
  // "abcd" is never completed, so the scan falls back to "a" and continues from "b".
  let generator = generator("A: a$ B: b$ ABCD: abcd$ C: c$");
  assert_eq!(scan(&generator, "abcb").unwrap(), vec![("A", "a"), ("B", "b"), ("C", "c"), ("B", "b")]);
}

#[test]
fn keyword_override() {
  let generator = generator("IDENT: [a-z]+$ [keywords] { IF: if }$");
  assert_eq!(scan(&generator, "if").unwrap(), vec![("IF", "if")]);
  assert_eq!(scan(&generator, "ifx").unwrap(), vec![("IDENT", "ifx")]);
}

#[test]
fn ignore_filtering() {
  let generator = generator("IDENT: [a-z]+$ WS: [ \\t\\n]+$ [ignore] { WS }$");
  assert_eq!(scan(&generator, "a b").unwrap(), vec![("IDENT", "a"), ("IDENT", "b")]);
}

#[test]
fn keyword_can_be_ignored() {
  let generator = generator("IDENT: [a-z]+$ WS: [ ]+$ [keywords] { SKIP: skip }$ [ignore] { WS, SKIP }$");
  assert_eq!(scan(&generator, "a skip b").unwrap(), vec![("IDENT", "a"), ("IDENT", "b")]);
}

#[test]
fn no_match() {
  let generator = generator("A: a$");
  assert_eq!(scan(&generator, "b"), Err(ScanError::NoMatch { position: 0, found: 'b' }));
}

#[test]
fn no_match_after_tokens() {
  let generator = generator("A: a$");
  assert_eq!(scan(&generator, "aab"), Err(ScanError::NoMatch { position: 2, found: 'b' }));
}

#[test]
fn trailing_input_after_candidate_is_rescanned() {
  let generator = generator("A: a$ B: b$ ABC: abc$");
  assert_eq!(scan(&generator, "ab").unwrap(), vec![("A", "a"), ("B", "b")]);
}

#[test]
fn unfinished_token_at_end_of_input() {
  let generator = generator("ABC: abc$");
  assert_eq!(scan(&generator, "abcab"), Err(ScanError::UnexpectedEnd { start: 3 }));
}

#[test]
fn declaration_order_breaks_ties() {
  let ident_first = generator("IDENT: [a-z]+$ IF: if$");
  assert_eq!(scan(&ident_first, "if").unwrap(), vec![("IDENT", "if")]);

  let if_first = generator("IF: if$ IDENT: [a-z]+$");
  assert_eq!(scan(&if_first, "if").unwrap(), vec![("IF", "if")]);
  assert_eq!(scan(&if_first, "ifs").unwrap(), vec![("IDENT", "ifs")]);
}

#[test]
fn identical_patterns_keep_the_first_tag() {
  let generator = generator("FIRST: [0-9]+$ SECOND: [0-9]+$");
  assert_eq!(scan(&generator, "42").unwrap(), vec![("FIRST", "42")]);
}

#[test]
fn unicode_input() {
  let generator = generator("GREEK: [α-ω]+$ WS: \\s+$ [ignore] { WS }$");
  let tokens = generator.tokenize("λόγος αβ").unwrap_err();
  assert_eq!(tokens, ScanError::NoMatch { position: 2, found: 'ό' });

  let tokens = generator.tokenize("λαμ βγ").unwrap();
  assert_eq!(tokens.len(), 2);
  assert_eq!(tokens[1].text, "βγ");
  assert_eq!(tokens[1].span.start().to_usize(), 7);
}

#[test]
fn escaped_dollar_in_pattern() {
  let generator = generator("DOLLAR: \\$[0-9]+$");
  assert_eq!(scan(&generator, "$42").unwrap(), vec![("DOLLAR", "$42")]);
}

#[test]
fn zero_patterns_is_an_error() {
  assert!(matches!(Generator::new("[ignore] { WS }$"), Err(GenerateError::NoPatterns)));
}

#[test]
fn emitted_tables_reload_identically() {
  let generator = generator(
    "IDENT: [a-zA-Z_][a-zA-Z0-9_]*$\n\
     NUM: [0-9]+(\\.[0-9]+)?$\n\
     STR: \"([^\"\\\\]|\\\\.)*\"$\n\
     WS: [ \\t\\n]+$\n\
     [keywords] { IF: if, ELSE: else }$\n\
     [ignore] { WS }$\n\
     [user_def, STR] { let _ = s; *pos += 0; }$",
  );
  let text = generator.emit("// template");
  let reloaded = reload(&text).unwrap();

  assert_eq!(&reloaded, generator.tables());

  let input = "if x1 else \"a\\\"b\" 3.14 y";
  assert_eq!(reloaded.tokenize(input), generator.tokenize(input));
}

#[test]
fn generated_output_reused_as_template() {
  let old = generator("OLD: [0-9]+$");
  let new = generator("NEW: [a-z]+$ [keywords] { IF: if }$");
  let text = new.emit(&old.emit("// template"));

  let reloaded = reload(&text).unwrap();
  assert_eq!(&reloaded, new.tables());
  assert_eq!(reloaded.tokenize("if").unwrap()[0].tag, "IF");
}

#[test]
fn emitted_text_contains_user_code_verbatim() {
  let generator = generator("A: a$ [user_def, A] { *pos += \"\\$\".len(); }$");
  let text = generator.emit("");
  assert!(text.contains("(\"A\", |s: &str, pos: &mut usize|  { *pos += \"$\".len(); }),"));
  assert!(text.ends_with("Lexer::with_entry(content, 0)\n  }\n}\n"));
}

#[test]
fn concurrent_scans_share_tables() {
  let generator = generator("WORD: [a-z]+$ WS: [ ]+$ [ignore] { WS }$");
  let inputs = ["alpha beta", "gamma", "delta epsilon zeta", "eta"];
  let shared = &generator;

  std::thread::scope(|scope| {
    let handles: Vec<_> =
        inputs.iter()
              .map(|input| scope.spawn(move || shared.tokenize(input).map(|tokens| tokens.len())))
              .collect();
    let counts: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap().unwrap()).collect();
    assert_eq!(counts, vec![2, 1, 3, 1]);
  });
}
