use blocks::style::Breakpoint;

/// Mutable state for one compile run: the generated class counter and the
/// media-scoped rule buckets. Both only ever grow.
#[derive(Debug, Default)]
pub struct CompileContext {
    /// Number of class names handed out so far.
    class_counter: usize,
    /// Rules per responsive breakpoint, indexed as `Breakpoint::RESPONSIVE`.
    rules: [Vec<String>; 3],
}

impl CompileContext {
    pub fn new() -> Self {
        CompileContext::default()
    }

    /// Allocate the next generated class name (`bp-1`, `bp-2`, ...).
    pub fn next_class_name(&mut self) -> String {
        self.class_counter += 1;
        format!("bp-{}", self.class_counter)
    }

    pub fn classes_allocated(&self) -> usize {
        self.class_counter
    }

    /// Record `.{class}{declarations}` under a responsive breakpoint.
    /// `Large` styles are always inline and have no bucket; pushing one is a no-op.
    pub fn push_rule(&mut self, breakpoint: Breakpoint, class_name: &str, declarations: &str) {
        let Some(index) = bucket_index(breakpoint) else {
            log::trace!("ignoring media rule for unconditional breakpoint");
            return;
        };
        self.rules[index].push(format!(".{}{{{}}}", class_name, declarations));
    }

    /// Rules recorded for a breakpoint, in first-seen order.
    pub fn rules(&self, breakpoint: Breakpoint) -> &[String] {
        match bucket_index(breakpoint) {
            Some(index) => &self.rules[index],
            None => &[],
        }
    }

    /// One `@media` block per non-empty bucket, in breakpoint order, joined by newlines.
    pub fn media_css(&self) -> String {
        let mut blocks = Vec::new();
        for breakpoint in Breakpoint::RESPONSIVE {
            let rules = self.rules(breakpoint);
            let Some(query) = breakpoint.media_query() else {
                continue;
            };
            if rules.is_empty() {
                continue;
            }
            blocks.push(format!("@media {}{{{}}}", query, rules.concat()));
        }
        blocks.join("\n")
    }
}

fn bucket_index(breakpoint: Breakpoint) -> Option<usize> {
    Breakpoint::RESPONSIVE
        .iter()
        .position(|bp| *bp == breakpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_are_monotonic() {
        let mut ctx = CompileContext::new();
        assert_eq!(ctx.next_class_name(), "bp-1");
        assert_eq!(ctx.next_class_name(), "bp-2");
        assert_eq!(ctx.classes_allocated(), 2);
    }

    #[test]
    fn empty_context_has_no_media_css() {
        assert_eq!(CompileContext::new().media_css(), "");
    }

    #[test]
    fn buckets_keep_first_seen_order_per_breakpoint() {
        let mut ctx = CompileContext::new();
        ctx.push_rule(Breakpoint::XSmall, "bp-1", "display:none;");
        ctx.push_rule(Breakpoint::Medium, "bp-1", "width:50%;");
        ctx.push_rule(Breakpoint::Medium, "bp-2", "gap:4px;");
        ctx.push_rule(Breakpoint::Large, "bp-3", "color:red;");

        assert_eq!(ctx.rules(Breakpoint::Medium), [".bp-1{width:50%;}", ".bp-2{gap:4px;}"]);
        assert!(ctx.rules(Breakpoint::Small).is_empty());
        assert!(ctx.rules(Breakpoint::Large).is_empty());
        assert_eq!(
            ctx.media_css(),
            "@media (max-width: 991px){.bp-1{width:50%;}.bp-2{gap:4px;}}\n\
             @media (max-width: 480px){.bp-1{display:none;}}"
        );
    }
}
