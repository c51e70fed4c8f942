//! Searches against in-memory collaborators.

use layered_sync::{
    Direction, ObservedEvent, RecordingObserver, SyncConfig, SyncError, SyncResult,
};

use crate::{
    BackwardTarget, CoarseLocator, ConstructFinder, Correlator, ForwardTarget, Glyph, PageRect,
    Point, Rect, Region, RenderedContext, SingleLine, SourceDocument, SourceLocation, TextLayout,
};

const GLYPH_WIDTH: f64 = 5.0;
const LINE_HEIGHT: f64 = 12.0;

#[derive(Default)]
struct FakeLocator {
    backward: Option<SourceLocation>,
    forward: Option<Vec<PageRect>>,
}

impl CoarseLocator for FakeLocator {
    fn locate_backward(&self, _page: usize, _point: Point) -> Option<SourceLocation> {
        self.backward
    }

    fn locate_forward(&self, _line: usize, _column: usize) -> Option<Vec<PageRect>> {
        self.forward.clone()
    }
}

/// A page laid out on a fixed grid: one row per line, one cell per char.
#[derive(Default)]
struct FakeLayout {
    page: String,
    context: Option<RenderedContext>,
}

impl FakeLayout {
    fn page(lines: &[&str]) -> Self {
        Self {
            page: lines.join("\n"),
            context: None,
        }
    }

    fn with_context(mut self, before: &str, after: &str) -> Self {
        self.context = Some(RenderedContext::new(before, after));
        self
    }

    fn glyphs(&self) -> Vec<Glyph> {
        let mut glyphs = Vec::new();
        let (mut row, mut col) = (0usize, 0usize);
        for (index, ch) in self.page.chars().enumerate() {
            if ch == '\n' {
                row += 1;
                col = 0;
                continue;
            }
            if !ch.is_whitespace() {
                let x = col as f64 * GLYPH_WIDTH;
                let y = row as f64 * LINE_HEIGHT;
                glyphs.push(Glyph::new(ch, index, Rect::new(x, y, x + GLYPH_WIDTH, y + 10.0)));
            }
            col += 1;
        }
        glyphs
    }
}

impl TextLayout for FakeLayout {
    fn context_at(&self, _page: usize, _point: Point, _budget: usize) -> Option<RenderedContext> {
        self.context.clone()
    }

    fn text_in(&self, _page: usize, rect: Rect) -> Option<Vec<Glyph>> {
        let inside: Vec<Glyph> = self
            .glyphs()
            .into_iter()
            .filter(|g| {
                g.rect.x0 < rect.x1 && g.rect.x1 > rect.x0 && g.rect.y0 < rect.y1 && g.rect.y1 > rect.y0
            })
            .collect();
        Some(inside)
    }
}

fn char_pos(text: &str, needle: &str) -> usize {
    let byte = text.find(needle).unwrap();
    text[..byte].chars().count()
}

const INTEGRAL_SOURCE: &str = "Intro line.\nThe $\\int f(x)\\,dx$ is finite.\nEnd.";

fn integral_fakes() -> (FakeLocator, FakeLayout) {
    let locator = FakeLocator {
        backward: Some(SourceLocation::new(1, 0)),
        forward: None,
    };
    let layout = FakeLayout::default().with_context("The ", "∫ f(x) dx is finite.");
    (locator, layout)
}

#[test]
fn backward_lands_on_macro() {
    let doc = SourceDocument::from_text(INTEGRAL_SOURCE);
    let config = SyncConfig::default();
    let (locator, layout) = integral_fakes();

    let target = Correlator::new(&config, &locator, &layout)
        .backward(&doc, 1, Point::new(20.0, 30.0))
        .unwrap();

    let expected = char_pos(INTEGRAL_SOURCE, "int");
    match target {
        BackwardTarget::Exact { offset, .. } => assert_eq!(offset, expected),
        other => panic!("expected exact target, got {:?}", other),
    }
    assert_eq!(expected, 18);
}

#[test]
fn backward_reports_to_observer() {
    let doc = SourceDocument::from_text(INTEGRAL_SOURCE);
    let config = SyncConfig::default();
    let (locator, layout) = integral_fakes();
    let observer = RecordingObserver::new();

    Correlator::new(&config, &locator, &layout)
        .with_observer(&observer)
        .backward(&doc, 1, Point::new(20.0, 30.0))
        .unwrap();

    let events = observer.events();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[2],
        ObservedEvent::AfterResolution {
            direction: Direction::Backward,
            position: Some(6),
        }
    );
}

#[test]
fn backward_degrades_to_coarse() {
    let doc = SourceDocument::from_text(INTEGRAL_SOURCE);
    let (locator, layout) = integral_fakes();
    let coarse = BackwardTarget::Coarse { line: 1, column: 0 };

    let disabled = SyncConfig::default().coarse_only();
    assert_eq!(
        Correlator::new(&disabled, &locator, &layout).backward(&doc, 1, Point::new(0.0, 0.0)),
        Ok(coarse)
    );

    let config = SyncConfig::default();
    let blank = FakeLayout::default();
    assert_eq!(
        Correlator::new(&config, &locator, &blank).backward(&doc, 1, Point::new(0.0, 0.0)),
        Ok(coarse)
    );

    let unrelated = FakeLayout::default().with_context("[ ", " ]");
    assert_eq!(
        Correlator::new(&config, &locator, &unrelated).backward(&doc, 1, Point::new(0.0, 0.0)),
        Ok(coarse)
    );

    let lost = FakeLocator::default();
    assert_eq!(
        Correlator::new(&config, &lost, &layout).backward(&doc, 1, Point::new(0.0, 0.0)),
        Err(SyncError::NoOracleMatch)
    );
}

const INEQUALITY_SOURCE: &str = r"Let $x \le y$ hold.";

fn inequality_fakes() -> (FakeLocator, FakeLayout) {
    let locator = FakeLocator {
        backward: None,
        forward: Some(vec![
            PageRect::new(3, Rect::new(0.0, 0.0, 40.0, 10.0)),
            PageRect::new(3, Rect::new(40.0, 1.0, 200.0, 9.0)),
        ]),
    };
    (locator, FakeLayout::page(&["Let x ≤ y hold."]))
}

#[test]
fn forward_highlights_word() {
    let doc = SourceDocument::from_text(INEQUALITY_SOURCE);
    let config = SyncConfig::default();
    let (locator, layout) = inequality_fakes();

    let column = char_pos(INEQUALITY_SOURCE, "hold") + 1;
    let target = Correlator::new(&config, &locator, &layout)
        .forward(&doc, 0, column)
        .unwrap();

    insta::assert_debug_snapshot!(target, @r###"
    Exact {
        page: 3,
        rect: Rect {
            x0: 50.0,
            y0: 0.0,
            x1: 70.0,
            y1: 10.0,
        },
        score: 30,
    }
    "###);
}

#[test]
fn forward_highlights_glyph() {
    let doc = SourceDocument::from_text(INEQUALITY_SOURCE);
    let config = SyncConfig::default();
    let (locator, layout) = inequality_fakes();

    let column = char_pos(INEQUALITY_SOURCE, "le");
    let target = Correlator::new(&config, &locator, &layout)
        .forward(&doc, 0, column)
        .unwrap();

    match target {
        ForwardTarget::Exact { page, rect, .. } => {
            assert_eq!(page, 3);
            assert_eq!(rect, Rect::new(30.0, 0.0, 35.0, 10.0));
        }
        other => panic!("expected exact target, got {:?}", other),
    }
}

#[test]
fn forward_degrades_to_coarse() {
    let doc = SourceDocument::from_text(INEQUALITY_SOURCE);
    let (locator, layout) = inequality_fakes();

    let disabled = SyncConfig::default().coarse_only();
    assert_eq!(
        Correlator::new(&disabled, &locator, &layout).forward(&doc, 0, 0),
        Ok(ForwardTarget::Coarse { page: 3 })
    );

    let config = SyncConfig::default();
    let empty_page = FakeLayout::page(&[]);
    let target = Correlator::new(&config, &locator, &empty_page)
        .forward(&doc, 0, 0)
        .unwrap();
    assert_eq!(target, ForwardTarget::Coarse { page: 3 });
    assert_eq!(target.page(), 3);

    let lost = FakeLocator::default();
    assert_eq!(
        Correlator::new(&config, &lost, &layout).forward(&doc, 0, 0),
        Err(SyncError::NoOracleMatch)
    );

    let nothing = FakeLocator {
        backward: None,
        forward: Some(Vec::new()),
    };
    assert_eq!(
        Correlator::new(&config, &nothing, &layout).forward(&doc, 0, 0),
        Err(SyncError::NoOracleMatch)
    );
}

#[test]
fn forward_uses_whole_environment() {
    let source = "Text before.\n\\begin{align}\n  a &= b + c\n\\end{align}";
    let doc = SourceDocument::from_text(source);
    let config = SyncConfig::default();
    let locator = FakeLocator {
        backward: None,
        forward: Some(vec![PageRect::new(1, Rect::new(0.0, 0.0, 100.0, 10.0))]),
    };
    let layout = FakeLayout::page(&["a = b + c"]);

    let target = Correlator::new(&config, &locator, &layout)
        .forward(&doc, 1, 0)
        .unwrap();
    assert_eq!(
        target,
        ForwardTarget::Exact {
            page: 1,
            rect: Rect::new(0.0, 0.0, 5.0, 10.0),
            score: 4,
        }
    );

    // The opening line alone holds nothing but markup.
    let single = Correlator::new(&config, &locator, &layout)
        .with_constructs(&SingleLine)
        .forward(&doc, 1, 0)
        .unwrap();
    assert_eq!(single, ForwardTarget::Coarse { page: 1 });
}

/// Answers with the line after the one asked for.
struct NextLine;

impl ConstructFinder for NextLine {
    fn find_enclosing_construct(&self, document: &SourceDocument, line: usize) -> SyncResult<Region> {
        document
            .line_region(line + 1)
            .ok_or(SyncError::RegionHeuristicMiss { offset: 0 })
    }
}

#[test]
fn forward_ignores_region_off_the_cursor_line() {
    let source = format!("{}\nNext line.", INEQUALITY_SOURCE);
    let doc = SourceDocument::from_text(&source);
    let config = SyncConfig::default();
    let (locator, layout) = inequality_fakes();

    let column = char_pos(INEQUALITY_SOURCE, "hold") + 1;
    let target = Correlator::new(&config, &locator, &layout)
        .with_constructs(&NextLine)
        .forward(&doc, 0, column)
        .unwrap();
    assert_eq!(
        target,
        ForwardTarget::Exact {
            page: 3,
            rect: Rect::new(50.0, 0.0, 70.0, 10.0),
            score: 30,
        }
    );
}

#[test]
fn long_environment_stays_on_one_line() {
    let mut source = String::from("\\begin{proof} Assume x is large.\n");
    for idx in 0..60 {
        source.push_str(&format!("filler {}\n", idx));
    }
    source.push_str("\\end{proof}");
    let doc = SourceDocument::from_text(&source);

    let locator = FakeLocator {
        backward: Some(SourceLocation::new(0, 0)),
        forward: None,
    };
    let layout = FakeLayout::default().with_context("Assume x is ", "large.");
    let target_tokens = |config: &SyncConfig| {
        let observer = RecordingObserver::new();
        let target = Correlator::new(config, &locator, &layout)
            .with_observer(&observer)
            .backward(&doc, 1, Point::new(0.0, 0.0))
            .unwrap();
        match observer.events().first() {
            Some(ObservedEvent::BeforeAlignment { target_tokens, .. }) => (target, *target_tokens),
            other => panic!("expected alignment, got {:?}", other),
        }
    };

    let mut config = SyncConfig::default();
    config.enclosing_constructs.clear();
    let (bounded, tokens) = target_tokens(&config);
    assert_eq!(tokens, 5);
    assert_eq!(
        bounded,
        BackwardTarget::Exact {
            offset: char_pos(&source, "large"),
            score: 66,
        }
    );

    config.construct_lines = 100;
    let (_, tokens) = target_tokens(&config);
    assert_eq!(tokens, 125);
}
