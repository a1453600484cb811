//! Integration tests for the template language

use pretty_assertions::assert_eq;
use serde_json::json;

use layout_view::parser::{parse, Node};
use layout_view::{RenderContext, Template};

fn render(source: &str, ctx: &mut RenderContext) -> String {
    Template::parse("test", source)
        .expect("Should parse")
        .render(ctx, false)
        .expect("Should render")
}

#[test]
fn test_directive_lines_leave_no_blank_lines() {
    let mut ctx = RenderContext::new();
    let out = render(
        "#set($layout = \"shell\")\n#set($title = \"Docs\")\n<h1>$title</h1>\n",
        &mut ctx,
    );
    insta::assert_snapshot!(out.trim_end(), @"<h1>Docs</h1>");
    assert_eq!(ctx.get("layout"), Some(&json!("shell")));
}

#[test]
fn test_text_with_sigils_survives() {
    let mut ctx = RenderContext::new();
    ctx.insert("price", 5);
    let out = render("Price: $ $price (#1 = \"best\") 100%", &mut ctx);
    assert_eq!(out, "Price: $ 5 (#1 = \"best\") 100%");
}

#[test]
fn test_context_from_json_drives_template() {
    let mut ctx = RenderContext::from_json(json!({
        "user": "Ada",
        "visits": 3,
        "tags": ["a", "b"],
    }))
    .unwrap();
    let out = render("$user has $visits visits, tags $tags, $!nothing.", &mut ctx);
    assert_eq!(out, r#"Ada has 3 visits, tags ["a","b"], ."#);
}

#[test]
fn test_directive_and_reference_nodes() {
    let doc = parse("#set($layout = \"x\")$a ${b} $!c").expect("Should parse");
    assert!(matches!(doc.nodes[0].node, Node::Set { ref target, .. } if target == "layout"));
    let printed: Vec<_> = doc
        .nodes
        .iter()
        .filter_map(|n| match &n.node {
            Node::Print(r) => Some(r.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(printed, vec!["a", "b", "c"]);
}

#[test]
fn test_references_inside_attributes() {
    let mut ctx = RenderContext::new();
    ctx.insert("id", 7);
    ctx.insert("cls", "user");
    let out = render(r#"<a href="/u/$id" class="${cls}-link">x</a>"#, &mut ctx);
    assert_eq!(out, r#"<a href="/u/7" class="user-link">x</a>"#);
}

#[test]
fn test_unpaired_quote_does_not_swallow_text() {
    let mut ctx = RenderContext::new();
    ctx.insert("size", 5);
    ctx.insert("body", "<p>Hi</p>");
    let out = render("<p>Size $size\"</p>\n$body\n<a href=\"x\">", &mut ctx);
    assert_eq!(out, "<p>Size 5\"</p>\n<p>Hi</p>\n<a href=\"x\">");
}

#[test]
fn test_set_prefixed_words_are_text() {
    let mut ctx = RenderContext::new();
    let out = render(
        "<style>#setup-panel { color: red }</style>\n<a href=\"#settings\">#set</a>",
        &mut ctx,
    );
    assert_eq!(
        out,
        "<style>#setup-panel { color: red }</style>\n<a href=\"#settings\">#set</a>"
    );
    assert!(ctx.is_empty());
}

#[test]
fn test_set_allows_blanks_before_parenthesis() {
    let mut ctx = RenderContext::new();
    let out = render("#set ($title = \"Docs\")<h1>$title</h1>", &mut ctx);
    assert_eq!(out, "<h1>Docs</h1>");
}

#[test]
fn test_comment_edge_cases() {
    let mut ctx = RenderContext::new();
    assert_eq!(render("a#* note **#b", &mut ctx), "ab");
    assert_eq!(render("a#**#b", &mut ctx), "ab");
    assert_eq!(render("a#*** banner ***#b", &mut ctx), "ab");
    assert_eq!(render("a#* 2 * 3 = \"6\" $x *#b", &mut ctx), "ab");
    assert_eq!(render("a## \"unpaired\nb", &mut ctx), "ab");
}

#[test]
fn test_syntax_error_span_points_into_directive() {
    let errs = parse("abc #set($x 1)").unwrap_err();
    let span = errs[0].span();
    assert!(span.start >= 4, "span {:?} should be inside the directive", span);
}
