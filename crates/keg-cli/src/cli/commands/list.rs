//! `keg list` – show the recipe book.

use keg_core::recipe::RecipeBook;

pub fn run_list(book: &RecipeBook) {
    for name in book.names() {
        let revisions = book.revisions(name);
        let versions: Vec<String> = revisions.iter().map(|r| r.version.to_string()).collect();
        let license = revisions
            .last()
            .map(|r| r.license.as_str())
            .unwrap_or("unknown");
        println!("{name} ({license}): {}", versions.join(", "));
    }
}
