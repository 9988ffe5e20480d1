use log::{info, warn, LevelFilter};
use simplelog::{Config, SimpleLogger};
use splay_set::SplaySet;
use std::env;
use std::fmt::Display;

/// Renders the tree sideways: right subtree above, left subtree below, four spaces per level.
fn render<T>(set: &SplaySet<T>) -> String
where
    T: Display,
{
    let mut ret = String::new();
    let mut stack = Vec::new();
    let mut current = set.root().map(|node| (node, 0));
    loop {
        while let Some((node, depth)) = current {
            stack.push((node, depth));
            current = node.right().map(|child| (child, depth + 1));
        }
        let (node, depth) = match stack.pop() {
            Some(entry) => entry,
            None => break,
        };
        ret.push_str(&format!("{:width$}{}\n", "", node.value(), width = depth * 4));
        current = node.left().map(|child| (child, depth + 1));
    }
    ret
}

fn print_tree<T>(set: &SplaySet<T>)
where
    T: Display,
{
    println!("Tree Structure:");
    println!("{}", render(set));
}

fn main() {
    let level = match env::var("SPLAY_SET_DEBUG") {
        Ok(_) => LevelFilter::Debug,
        Err(_) => LevelFilter::Info,
    };
    if let Err(err) = SimpleLogger::init(level, Config::default()) {
        eprintln!("failed to install logger: {}", err);
    }

    let mut tree = SplaySet::new();

    info!("insert and splay");
    for value in &[10, 5, 15] {
        tree.insert(*value);
        print_tree(&tree);
    }

    info!("contains and splay");
    let contains = tree.contains(&5);
    println!("Contains 5: {}", contains);
    print_tree(&tree);

    info!("remove and splay");
    tree.remove(&10);
    print_tree(&tree);

    info!("undo after insert");
    tree.insert(20);
    println!("Tree Structure after Insert:");
    print_tree(&tree);
    let undone = tree.undo();
    println!("Tree Structure after Undo:");
    print_tree(&undone);

    info!("clone and equals");
    let copy = tree.clone();
    println!("Original equals Clone: {}", tree == copy);

    info!("undo after repeated insert");
    tree.insert(20);
    println!("Tree Structure after Insert:");
    print_tree(&tree);
    let undone = tree.undo();
    println!("Tree Structure after Undo:");
    print_tree(&undone);

    if let Err(err) = undone.validate() {
        warn!("undo produced an invalid tree: {}", err);
    }
}
