use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tix::api::{CmdMessage, MessageLevel};
use tix::config::TixConfig;
use tix::error::Result;
use tix::init::initialize;
use tix::model::Ticket;
use tix::store::ATTACHMENTS_DIR;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // `init` must work before any environment exists.
    if matches!(cli.command, Commands::Init) {
        let result = tix::commands::init::run(&cwd)?;
        print_messages(&result.messages);
        return Ok(());
    }

    let mut ctx = initialize(&cwd)?;
    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Add { name } => {
            let result = ctx.api.add_ticket(&name)?;
            print_messages(&result.messages);
        }
        Commands::List { tokens } => {
            let result = ctx.api.list_tickets(&tokens)?;
            if !result.listed.is_empty() {
                if let Some(root) = &ctx.root {
                    println!(
                        "Listing tickets from {}",
                        root.join(&ctx.api.config().tickets_dir).display()
                    );
                }
            }
            print_ticket_table(&result.listed, ctx.api.config());
            print_messages(&result.messages);
        }
        Commands::Show { id } => {
            let result = ctx.api.show_ticket(&id)?;
            for (i, ticket) in result.listed.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_ticket_details(ticket, ctx.api.config());
            }
            print_messages(&result.messages);
        }
        Commands::Comment { id, text } => {
            let result = ctx.api.add_comment(&id, &text)?;
            print_messages(&result.messages);
        }
        Commands::Attach { id, args } => {
            let result = ctx.api.attach_files(&id, &args)?;
            print_messages(&result.messages);
        }
        Commands::Status { id, status } => {
            let result = ctx.api.set_status(&id, &status)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const COLUMN_PADDING: usize = 3;

fn severity_colored(text: &str, severity: &str, config: &TixConfig) -> ColoredString {
    match config.color_for(severity) {
        Some(color) => text.color(color),
        None => text.normal(),
    }
}

fn print_ticket_table(tickets: &[Ticket], config: &TixConfig) {
    if tickets.is_empty() {
        return;
    }

    let header = ["Id", "Name", "Status", "Created"];
    let rows: Vec<[String; 4]> = tickets
        .iter()
        .map(|t| {
            [
                t.short_id().to_string(),
                t.data.name.clone(),
                t.data.status.clone(),
                t.data.created.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let header_line = format_row(&header.map(String::from), &widths);
    println!("{}", header_line.underline());
    for (ticket, row) in tickets.iter().zip(&rows) {
        let line = format_row(row, &widths);
        println!(
            "{}",
            severity_colored(&line, &ticket.data.severity, config)
        );
    }
}

fn format_row(cells: &[String; 4], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        line.push_str(cell);
        if i < cells.len() - 1 {
            let padding = widths[i].saturating_sub(cell.width()) + COLUMN_PADDING;
            line.push_str(&" ".repeat(padding));
        }
    }
    line
}

fn print_ticket_details(ticket: &Ticket, config: &TixConfig) {
    let fields = [
        ("Id:", ticket.short_id().to_string()),
        ("Name:", ticket.data.name.clone()),
        ("Description:", ticket.data.description.clone()),
        ("Status:", ticket.data.status.clone()),
        (
            "Severity:",
            severity_colored(&ticket.data.severity, &ticket.data.severity, config).to_string(),
        ),
        ("Created by:", ticket.data.created_by.clone()),
        (
            "Created:",
            ticket.data.created.format("%Y-%m-%d %H:%M").to_string(),
        ),
        (
            "Updated:",
            ticket.data.updated.format("%Y-%m-%d %H:%M").to_string(),
        ),
    ];
    let label_width = fields.iter().map(|(l, _)| l.width()).max().unwrap_or(0);
    for (label, value) in &fields {
        // Pad before styling so the escape codes do not skew the alignment.
        let padded = format!("{:>width$}", label, width = label_width);
        println!("{}  {}", padded.bold(), value);
    }

    if !ticket.comments().is_empty() {
        println!();
        println!("{}", "Comments:".bold());
        for comment in ticket.comments() {
            println!(
                "  {} {} {}",
                comment.created.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                comment.created_by.dimmed(),
                comment.comment
            );
        }
    }

    if !ticket.attachments().is_empty() {
        println!();
        println!("{}", "Attachments:".bold());
        for attachment in ticket.attachments() {
            let path = ticket.dir().map(|dir| {
                dir.join(ATTACHMENTS_DIR)
                    .join(&attachment.file_id)
                    .join(&attachment.original_name)
            });
            println!(
                "  {} {} \"{}\" {}",
                attachment.file_id.yellow(),
                attachment.original_name,
                attachment.comment,
                path.map(|p| p.display().to_string()).unwrap_or_default().dimmed()
            );
        }
    }
}
