use crate::surface::{Mark, Surface};

/// Half-open range `[start, end)` of typed chars that differ from the target
/// at the same index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorRun {
    pub start: usize,
    pub end: usize,
}

impl ErrorRun {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Maximal mismatch runs, compared position by position. Typed characters
/// past the end of the target are mismatches.
pub fn error_runs(typed: &[char], target: &[char]) -> Vec<ErrorRun> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;

    for (i, &ch) in typed.iter().enumerate() {
        let matches = target.get(i) == Some(&ch);
        match (open, matches) {
            (None, false) => open = Some(i),
            (Some(start), true) => {
                runs.push(ErrorRun { start, end: i });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(ErrorRun {
            start,
            end: typed.len(),
        });
    }
    runs
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Error(String),
}

/// Splits the typed text into plain and error segments covering all of it.
pub fn segments(typed: &[char], runs: &[ErrorRun]) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut pos = 0;
    for run in runs {
        if run.start > pos {
            out.push(Segment::Plain(typed[pos..run.start].iter().collect()));
        }
        out.push(Segment::Error(typed[run.start..run.end].iter().collect()));
        pos = run.end;
    }
    if pos < typed.len() {
        out.push(Segment::Plain(typed[pos..].iter().collect()));
    }
    out
}

/// Replaces the highlight surface's content wholesale: plain text nodes
/// interleaved with `ErrorRun` elements.
pub fn render(surface: &mut Surface, typed: &str, target: &str) -> Vec<ErrorRun> {
    let typed: Vec<char> = typed.chars().collect();
    let target: Vec<char> = target.chars().collect();
    let runs = error_runs(&typed, &target);

    surface.clear();
    let root = surface.root();
    for segment in segments(&typed, &runs) {
        match segment {
            Segment::Plain(text) => {
                surface.append_text(root, &text);
            }
            Segment::Error(text) => {
                if let Some(el) = surface.append_element(root, vec![Mark::ErrorRun]) {
                    surface.append_text(el, &text);
                }
            }
        }
    }
    runs
}

/// Reads the error runs back from a rendered highlight surface.
pub fn rendered_runs(surface: &Surface) -> Vec<ErrorRun> {
    let mut runs = Vec::new();
    let mut pos = 0;
    for &child in surface.children(surface.root()) {
        let len = surface.text_len(child);
        if surface.marks(child).contains(&Mark::ErrorRun) {
            runs.push(ErrorRun {
                start: pos,
                end: pos + len,
            });
        }
        pos += len;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn runs(typed: &str, target: &str) -> Vec<ErrorRun> {
        let typed: Vec<char> = typed.chars().collect();
        let target: Vec<char> = target.chars().collect();
        error_runs(&typed, &target)
    }

    #[test]
    fn prefix_of_target_has_no_runs() {
        let target = "the quick fox";
        for n in 0..=target.len() {
            assert!(runs(&target[..n], target).is_empty());
        }
    }

    #[test]
    fn all_wrong_is_one_run() {
        assert_eq!(runs("xyz", "abc"), vec![ErrorRun { start: 0, end: 3 }]);
    }

    #[test]
    fn runs_close_where_text_matches_again() {
        assert_eq!(
            runs("axcyyf", "abcdef"),
            vec![ErrorRun { start: 1, end: 2 }, ErrorRun { start: 3, end: 5 }]
        );
    }

    #[test]
    fn overflow_past_target_is_an_error() {
        assert_eq!(runs("abcd", "ab"), vec![ErrorRun { start: 2, end: 4 }]);
    }

    #[test]
    fn segments_cover_typed_text() {
        let typed: Vec<char> = "axcyyf".chars().collect();
        let r = runs("axcyyf", "abcdef");
        assert_eq!(
            segments(&typed, &r),
            vec![
                Segment::Plain("a".into()),
                Segment::Error("x".into()),
                Segment::Plain("c".into()),
                Segment::Error("yy".into()),
                Segment::Plain("f".into()),
            ]
        );
    }

    #[test]
    fn render_replaces_previous_content() {
        let mut s = Surface::new();
        render(&mut s, "axc", "abc");
        assert_eq!(rendered_runs(&s), vec![ErrorRun { start: 1, end: 2 }]);
        render(&mut s, "abc", "abc");
        assert!(rendered_runs(&s).is_empty());
        assert_eq!(s.text_content(s.root()), "abc");
        assert_eq!(s.children(s.root()).len(), 1);
    }
}
