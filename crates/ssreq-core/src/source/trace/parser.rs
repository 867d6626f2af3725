use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::source::{SourceError, StepSource, TraceStep};

use super::error::TraceSourceError;
use super::reader::read_step_line;

pub struct TraceFileSource {
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl TraceFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line: 0,
        })
    }
}

impl StepSource for TraceFileSource {
    fn next_step(&mut self) -> Result<Option<TraceStep>, SourceError> {
        next_step(&mut self.lines, &mut self.line).map_err(SourceError::from)
    }
}

fn next_step(
    lines: &mut Lines<BufReader<File>>,
    line: &mut usize,
) -> Result<Option<TraceStep>, TraceSourceError> {
    for text in lines.by_ref() {
        let text = text?;
        *line += 1;
        if let Some(step) = read_step_line(&text, *line)? {
            return Ok(Some(step));
        }
    }
    Ok(None)
}
