pub use codespan::Span;


pub type LSpan<'a> = nom_locate::LocatedSpan<&'a str>;


pub trait ToSpan {
  fn to_span(&self) -> Span;
}

impl ToSpan for Span {
  fn to_span(&self) -> Span {
    *self
  }
}

impl<'a, T: ToSpan> ToSpan for &'a T {
  fn to_span(&self) -> Span {
    (*self).to_span()
  }
}

impl<'a> ToSpan for LSpan<'a> {
  fn to_span(&self) -> Span {
    let start = self.location_offset();
    let end = start + self.fragment().len();
    Span::new(start as u32, end as u32)
  }
}

/// The span covering everything consumed between `start` and `rest`.
pub fn consumed<'a>(start: &LSpan<'a>, rest: &LSpan<'a>) -> Span {
  Span::new(start.location_offset() as u32, rest.location_offset() as u32)
}

/// An empty span at the current position of `input`.
pub fn point(input: &LSpan) -> Span {
  let at = input.location_offset() as u32;
  Span::new(at, at)
}
