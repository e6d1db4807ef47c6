use crate::block::Block;

/// Renders a block at the given nesting level.
///
/// A childless block renders as a single header line; a block with
/// children renders its header followed by ` {`, each child one level
/// deeper on its own line, and a closing `}` at the current level.
/// Indentation is two spaces per level. Pure and deterministic.
pub fn render(block: &Block, indent: usize) -> String {
    render_block(block, indent, false)
}

/// Renders a block like [`render`] but always with a `{ }` body, even
/// when it has no children.
pub fn render_forced(block: &Block, indent: usize) -> String {
    render_block(block, indent, true)
}

fn render_block(block: &Block, indent: usize, force_body: bool) -> String {
    let pad = "  ".repeat(indent);
    let mut header = format!("{pad}{}", block.kind);
    if !block.props.is_empty() {
        header.push(' ');
        header.push_str(&block.props.join(" "));
    }

    if block.children.is_empty() && !force_body {
        return header;
    }

    let mut lines = vec![format!("{header} {{")];
    for child in &block.children {
        lines.push(render_block(child, indent + 1, false));
    }
    lines.push(format!("{pad}}}"));
    lines.join("\n")
}

/// Assembles the full document: project header, resources, tasks, and the
/// optional report, separated by one blank line each. The project block
/// is the only one rendered with a forced body; a bodyless project
/// declaration is not valid in the target grammar.
pub fn render_document(
    project: &Block,
    resources: &[Block],
    tasks: &[Block],
    report: Option<&Block>,
) -> String {
    let mut blocks = vec![render_forced(project, 0)];
    blocks.extend(resources.iter().map(|block| render(block, 0)));
    blocks.extend(tasks.iter().map(|block| render(block, 0)));
    if let Some(report) = report {
        blocks.push(render(report, 0));
    }
    blocks.join("\n\n")
}
