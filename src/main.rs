use clap::Parser;
use std::process;
use support_goals::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Ok(commands::CommandStats::default())
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - output has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Support Goals - Team Performance Dashboard");
    println!("==========================================");
    println!();
    println!("Normalize the support and customer service performance sheets and");
    println!("check every agent against the team goals.");
    println!();
    println!("USAGE:");
    println!("    support-goals <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    show          Show the dashboard once");
    println!("    watch         Keep the dashboard on screen, refreshing periodically");
    println!("    export        Write goal and detail tables (csv, parquet) or JSON reports");
    println!("    init-config   Write the default configuration file");
    println!("    help          Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Show both sheets from a workbook:");
    println!("    support-goals show --workbook metas.xlsx");
    println!();
    println!("    # One team on one shift, with the per-queue breakdown:");
    println!("    support-goals show --csv-dir exports/ --sheet SAC --team Alpha --shift Manha --detail");
    println!();
    println!("    # Refresh every 30 seconds with a stricter chat goal:");
    println!("    support-goals watch --workbook metas.xlsx --interval 30 --min-chat-rating Suporte=4.6");
    println!();
    println!("    # Export the tables as CSV:");
    println!("    support-goals export --workbook metas.xlsx --output out/ --format csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    support-goals <COMMAND> --help");
}
