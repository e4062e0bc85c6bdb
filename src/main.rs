//! Slate - a tiny spreadsheet engine with a command-line driver.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;

use slate_core::{DisplaySheet, Sheet, SheetBuilder, SheetUpdate, SheetView, UpdateError};
use slate_engine::{CellLocation, Expr, SimpleParser};

const DEFAULT_ROWS: usize = 9;
const DEFAULT_COLUMNS: usize = 6;

fn print_usage() {
    eprintln!("Usage: slate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command \"<CELL> <FORMULA>\"   Apply one update, print the cell value,");
    eprintln!("                            exit after the last command (can be repeated)");
    eprintln!("  --rows <N>                Number of rows (default: {})", DEFAULT_ROWS);
    eprintln!("  --columns <N>             Number of columns, up to 26 (default: {})", DEFAULT_COLUMNS);
    eprintln!("  --display                 Display-only sheet: formulas are never evaluated");
    eprintln!("  -h, --help                Print help");
}

/// The sheet flavour the driver operates on.
enum Surface {
    Live(Sheet),
    Display(DisplaySheet),
}

impl Surface {
    fn view(&self) -> &dyn SheetView {
        match self {
            Surface::Live(sheet) => sheet,
            Surface::Display(sheet) => sheet,
        }
    }

    fn update(&mut self, row: usize, column: usize, input: &str) -> Result<(), UpdateError> {
        match self {
            Surface::Live(sheet) => sheet.update(row, column, input),
            Surface::Display(sheet) => sheet.update(row, column, input),
        }
    }

    /// Dependency queries only exist on the evaluating sheet.
    fn used_by(&self, location: CellLocation) -> Option<HashSet<CellLocation>> {
        match self {
            Surface::Live(sheet) => Some(sheet.used_by(location)),
            Surface::Display(_) => None,
        }
    }
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SLATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut rows = DEFAULT_ROWS;
    let mut columns = DEFAULT_COLUMNS;
    let mut display = false;
    let mut commands: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires an argument");
                    std::process::exit(1);
                }
                commands.push(args[i].clone());
            }
            "--rows" => {
                i += 1;
                rows = parse_dimension(&args, i, "--rows");
            }
            "--columns" => {
                i += 1;
                columns = parse_dimension(&args, i, "--columns");
            }
            "--display" => display = true,
            arg => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if rows == 0 || columns == 0 || columns > 26 {
        eprintln!("Error: the sheet needs at least one row and between 1 and 26 columns");
        std::process::exit(1);
    }

    let parser = Arc::new(SimpleParser);
    let mut surface = if display {
        Surface::Display(DisplaySheet::new(parser, Expr::Empty, rows, columns))
    } else {
        Surface::Live(SheetBuilder::new(parser, Expr::Empty).empty(rows, columns))
    };

    if !commands.is_empty() {
        for command in &commands {
            match apply(&mut surface, command) {
                Ok(shown) => println!("{}", shown),
                Err(message) => {
                    eprintln!("Error: {}", message);
                    std::process::exit(1);
                }
            }
        }
        return;
    }

    if let Err(error) = repl(&mut surface) {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}

fn parse_dimension(args: &[String], i: usize, flag: &str) -> usize {
    if i >= args.len() {
        eprintln!("Error: {} requires a number", flag);
        std::process::exit(1);
    }
    match args[i].parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: {} requires a number, got `{}`", flag, args[i]);
            std::process::exit(1);
        }
    }
}

/// Apply a `<CELL> <FORMULA>` command and return the cell's new display value.
fn apply(surface: &mut Surface, command: &str) -> Result<String, String> {
    let command = command.trim();
    let (cell, formula) = match command.split_once(char::is_whitespace) {
        Some((cell, rest)) => (cell, rest.trim()),
        // A bare cell name clears the cell.
        None => (command, ""),
    };
    let location = locate(surface.view(), cell)?;
    surface
        .update(location.row, location.col, formula)
        .map_err(|error| error.to_string())?;
    Ok(surface.view().value_at(location.row, location.col).content)
}

fn locate(view: &dyn SheetView, text: &str) -> Result<CellLocation, String> {
    let location =
        CellLocation::parse(text).ok_or_else(|| format!("`{}` is not a cell location", text))?;
    if location.row >= view.rows() || location.col >= view.columns() {
        return Err(format!(
            "{} is outside the {}x{} sheet",
            location,
            view.rows(),
            view.columns()
        ));
    }
    Ok(location)
}

fn print_commands() {
    println!("Commands:");
    println!("  set <CELL> <FORMULA>   Update a cell (empty formula clears it)");
    println!("  get <CELL>             Print a cell's evaluated value");
    println!("  formula <CELL>         Print a cell's stored formula");
    println!("  deps <CELL>            Print the cells that use this cell");
    println!("  show                   Print the whole grid");
    println!("  help                   Print this help");
    println!("  quit                   Exit");
}

fn repl(surface: &mut Surface) -> Result<()> {
    println!(
        "slate {}x{} - type `help` for commands",
        surface.view().rows(),
        surface.view().columns()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();

        match line.split_once(char::is_whitespace) {
            None => match line {
                "" => {}
                "quit" | "exit" | "q" => break,
                "help" => print_commands(),
                "show" => print_grid(surface.view()),
                other => eprintln!("Unknown command: {} (try `help`)", other),
            },
            Some((command, rest)) => {
                let rest = rest.trim();
                match command {
                    "set" => match apply(surface, rest) {
                        Ok(shown) => println!("{}", shown),
                        Err(message) => eprintln!("Error: {}", message),
                    },
                    "get" => match locate(surface.view(), rest) {
                        Ok(location) => println!(
                            "{}",
                            surface.view().value_at(location.row, location.col).content
                        ),
                        Err(message) => eprintln!("Error: {}", message),
                    },
                    "formula" => match locate(surface.view(), rest) {
                        Ok(location) => println!(
                            "{}",
                            surface
                                .view()
                                .formula_at(location.row, location.col)
                                .content
                        ),
                        Err(message) => eprintln!("Error: {}", message),
                    },
                    "deps" => match locate(surface.view(), rest) {
                        Ok(location) => match surface.used_by(location) {
                            Some(dependents) => {
                                let mut names: Vec<String> =
                                    dependents.iter().map(CellLocation::to_string).collect();
                                names.sort();
                                println!("{}", names.join(" "));
                            }
                            None => eprintln!("deps is not available on a display sheet"),
                        },
                        Err(message) => eprintln!("Error: {}", message),
                    },
                    other => eprintln!("Unknown command: {} (try `help`)", other),
                }
            }
        }
    }
    Ok(())
}

fn print_grid(view: &dyn SheetView) {
    let mut widths = vec![1usize; view.columns()];
    let mut grid = Vec::with_capacity(view.rows());
    for row in 0..view.rows() {
        let mut cells = Vec::with_capacity(view.columns());
        for col in 0..view.columns() {
            let content = view.value_at(row, col).content;
            widths[col] = widths[col].max(content.len());
            cells.push(content);
        }
        grid.push(cells);
    }

    let label = view.rows().saturating_sub(1).to_string().len();
    print!("{:>label$}", "");
    for (col, &width) in widths.iter().enumerate() {
        print!(" {:<width$}", (b'A' + col as u8) as char);
    }
    println!();
    for (row, cells) in grid.iter().enumerate() {
        print!("{:>label$}", row);
        for (col, content) in cells.iter().enumerate() {
            print!(" {:<width$}", content, width = widths[col]);
        }
        println!();
    }
}
