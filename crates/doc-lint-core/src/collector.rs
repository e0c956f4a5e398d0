//! Line buffer for in-process validators.

/// Collects the lines an in-process validator emits.
///
/// Stands in for the stdout stream a shelled-out tool would write, so the
/// same parser handles both execution strategies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collector {
    lines: Vec<String>,
}

impl Collector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line of output.
    pub fn puts(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Number of lines written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drops every line written after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.lines.truncate(len);
    }

    /// The collected output, one line per entry, newline-terminated.
    #[must_use]
    pub fn to_stdout(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collector_yields_empty_stdout() {
        assert_eq!(Collector::new().to_stdout(), "");
    }

    #[test]
    fn lines_are_newline_terminated() {
        let mut collector = Collector::new();
        collector.puts("lib/a.rb:3: Foo");
        collector.puts(String::from("lib/b.rb:9: Bar"));
        assert_eq!(collector.to_stdout(), "lib/a.rb:3: Foo\nlib/b.rb:9: Bar\n");
    }

    #[test]
    fn truncate_rolls_back_partial_output() {
        let mut collector = Collector::new();
        collector.puts("keep");
        let mark = collector.len();
        collector.puts("drop");
        collector.truncate(mark);
        assert_eq!(collector.to_stdout(), "keep\n");
    }
}
