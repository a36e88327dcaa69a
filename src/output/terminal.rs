// Colored terminal output for `gamebot lookup` and `gamebot audit`.

use colored::Colorize;

use crate::db::models::AuditEntry;
use crate::pipeline::ResolvedGames;

/// Show what a dry-run lookup found and the reply it would post.
pub fn display_lookup(references: &[String], resolved: &ResolvedGames, reply: Option<&str>) {
    if references.is_empty() {
        println!("No [bracketed] references found in the text.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Lookup ({} references) ===", references.len()).bold()
    );
    for reference in references {
        println!("  [{reference}]");
    }
    println!(
        "  {} queried, {} matched",
        resolved.queried,
        resolved.games.len()
    );

    for (i, game) in resolved.games.iter().enumerate() {
        println!(
            "  {}. {} {}",
            i + 1,
            game.name.green(),
            format!("({})", game.slug).dimmed()
        );
    }
    for failure in &resolved.failures {
        println!("  {} {}", "!".red().bold(), failure);
    }

    match reply {
        Some(text) => {
            println!("\n{}", "Reply that would be posted:".bold());
            println!("{text}");
        }
        None => println!("\n{}", "No reply would be posted.".yellow()),
    }
}

/// Show recent audit rows, newest first.
pub fn display_audit_entries(entries: &[AuditEntry]) {
    if entries.is_empty() {
        println!("No comments processed yet. Run `gamebot serve` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Audit Log ({} records) ===", entries.len()).bold()
    );
    println!();

    for entry in entries {
        let record = &entry.record;
        let status = match (record.reply_id, &record.reply_text) {
            (Some(id), _) => format!("replied #{id}").green(),
            (None, Some(_)) => "reply failed".red(),
            (None, None) if record.extracted_references.is_empty() => "no refs".dimmed(),
            (None, None) => "no reply".yellow(),
        };
        println!(
            "  {:>6}  {}  post {} comment {}  {}",
            entry.id,
            record.recorded_at.dimmed(),
            record.post_id,
            record.comment_id,
            status,
        );
        let preview = super::truncate_chars(&record.comment_text, 100);
        println!("          \"{}\"", preview.dimmed());
    }
    println!();
}
