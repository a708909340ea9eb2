//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use termtree::Tree;

use crate::domain::display::{Action, Content};
use crate::domain::tree::{NodeId, PageTree};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print prompt without newline (cyan)
pub fn prompt(msg: &(impl std::fmt::Display + ?Sized)) {
    use std::io::Write;
    print!("{} ", msg.to_string().cyan());
    std::io::stdout().flush().ok();
}

/// Render one screen: title header, body, dimmed footer.
pub fn screen(content: &Content) {
    if let Some(title) = &content.title {
        header(title);
    }
    if !content.body.is_empty() {
        println!("{}", content.body);
    }
    if let Some(footer) = &content.footer {
        println!("{}", footer.dimmed());
    }
}

/// Render the action bar: available controls and the numbered menu.
pub fn actions(actions: &[Action]) {
    let mut controls: Vec<String> = Vec::new();
    for action in actions {
        match action {
            Action::First => controls.push("[f]irst".to_string()),
            Action::Previous => controls.push("[p]rev".to_string()),
            Action::Next => controls.push("[n]ext".to_string()),
            Action::Last => controls.push("[l]ast".to_string()),
            Action::Back => controls.push("[b]ack".to_string()),
            Action::BackTwice => controls.push("[bb] back x2".to_string()),
            Action::Select(menu) => {
                println!("{}", menu.placeholder.dimmed());
                for (i, option) in menu.options.iter().enumerate() {
                    detail(&format!("[{}] {}", i + 1, option.label));
                }
            }
        }
    }
    controls.push("[t]ree".to_string());
    controls.push("[q]uit".to_string());
    println!("{}", controls.join("  ").dimmed());
}

/// Render the live navigation tree, marking the cursor position.
pub fn navigation_tree<P>(tree: &PageTree<P>, current: NodeId) -> Tree<String> {
    subtree(tree, tree.root(), current)
}

fn subtree<P>(tree: &PageTree<P>, id: NodeId, current: NodeId) -> Tree<String> {
    let label = tree
        .get(id)
        .map(|node| node.label().to_string())
        .unwrap_or_default();
    let label = if id == current {
        format!("{} {}", label, "<-- current".green())
    } else {
        label
    };
    let leaves: Vec<_> = tree
        .get(id)
        .map(|node| {
            node.children()
                .iter()
                .map(|&child| subtree(tree, child, current))
                .collect()
        })
        .unwrap_or_default();
    Tree::new(label).with_leaves(leaves)
}
