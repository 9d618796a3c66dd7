//! Text rendering of a flattened segment sequence.
//!
//! While writing, the renderer independently recounts segments per
//! transaction set, transaction sets per group and groups per interchange,
//! and fails if any trailer disagrees with the recount.

use crate::delimiters::Delimiters;
use crate::error::{EncodingError, Result};
use crate::segment::{Element, Segment};

#[derive(Debug, Default)]
struct Recount {
    groups: usize,
    transaction_sets: usize,
    /// Segments seen since the open ST, including the ST itself.
    segments: Option<usize>,
}

impl Recount {
    fn observe(&mut self, segment: &Segment) -> Result<()> {
        match segment.id() {
            "ISA" => self.groups = 0,
            "GS" => {
                self.groups += 1;
                self.transaction_sets = 0;
            }
            "ST" => {
                self.transaction_sets += 1;
                self.segments = Some(1);
            }
            "SE" => {
                let actual = self.segments.take().map_or(1, |count| count + 1);
                check("SE", segment, actual)?;
            }
            "GE" => check("GE", segment, self.transaction_sets)?,
            "IEA" => check("IEA", segment, self.groups)?,
            _ => {
                if let Some(count) = self.segments.as_mut() {
                    *count += 1;
                }
            }
        }
        Ok(())
    }
}

fn check(id: &'static str, trailer: &Segment, actual: usize) -> Result<()> {
    let declared = trailer
        .element_at(1)
        .and_then(Element::as_simple)
        .and_then(|value| value.parse::<usize>().ok())
        .ok_or_else(|| EncodingError::missing_field(id, format!("{id}01")))?;
    if declared != actual {
        return Err(EncodingError::CountMismatch {
            segment: id,
            declared,
            actual,
        });
    }
    Ok(())
}

/// Render segments into document text, verifying every trailer count.
pub fn render(segments: &[Segment], delimiters: &Delimiters, line_break: bool) -> Result<String> {
    let mut recount = Recount::default();
    let mut out = String::with_capacity(segments.len() * 48);
    for segment in segments {
        recount.observe(segment)?;
        segment.render_into(&mut out, delimiters);
        out.push(delimiters.segment);
        if line_break {
            out.push('\n');
        }
    }
    Ok(out)
}
