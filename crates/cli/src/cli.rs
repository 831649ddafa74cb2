use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;

fn arg_username() -> Arg {
    Arg::new("username")
        .short('u')
        .long("username")
        .help("Account username.")
        .required(true)
}

fn arg_password() -> Arg {
    Arg::new("password")
        .short('p')
        .long("password")
        .env("FINANCE_TRACKER_PASSWORD")
        .hide_env_values(true)
        .help("Account password. Read from stdin when omitted.")
}

fn arg_yes() -> Arg {
    Arg::new("yes")
        .short('y')
        .long("yes")
        .help("Skip the confirmation prompt.")
        .action(ArgAction::SetTrue)
}

fn subcommand_add() -> Command {
    Command::new("add")
        .about("Add a transaction. Positive amounts are expenses, negative amounts income.")
        .arg(
            Arg::new("amount")
                .short('a')
                .long("amount")
                .help("Signed amount, e.g. 42.50 or -1200")
                .allow_negative_numbers(true)
                .required(true),
        )
        .arg(
            Arg::new("class")
                .short('c')
                .long("class")
                .help("Category label, e.g. Groceries")
                .required(true),
        )
        .arg(
            Arg::new("date")
                .short('d')
                .long("date")
                .help("Date as YYYY-MM-DD. Defaults to today."),
        )
}

fn subcommand_delete() -> Command {
    Command::new("delete")
        .about("Delete a transaction by id.")
        .arg(
            Arg::new("id")
                .help("Transaction id as shown by `list`")
                .value_parser(value_parser!(i64))
                .required(true),
        )
        .arg(arg_yes())
}

fn subcommand_chart() -> Command {
    Command::new("chart")
        .about("Plot spending by category or over time.")
        .arg(
            Arg::new("kind")
                .help("Which summary to plot")
                .value_parser(PossibleValuesParser::new(["category", "time"]))
                .default_value("category"),
        )
}

pub fn build() -> Command {
    Command::new("ftrack")
        .about("Track spending and ask questions about it from the terminal.")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .env("FINANCE_TRACKER_BASE_URL")
                .global(true)
                .help("API origin. Overrides the config file."),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .env("FINANCE_TRACKER_CONFIG")
                .global(true)
                .help("Path to config.toml."),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and store the session.")
                .arg(arg_username())
                .arg(arg_password()),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account.")
                .arg(arg_username())
                .arg(arg_password()),
        )
        .subcommand(Command::new("logout").about("Forget the stored session."))
        .subcommand(Command::new("whoami").about("Show the logged in user."))
        .subcommand(
            Command::new("delete-account")
                .about("Delete the account and all of its transactions.")
                .arg(arg_yes()),
        )
        .subcommand(
            Command::new("ask")
                .about("Ask the finance agent a question.")
                .arg(
                    Arg::new("query")
                        .help("Question, e.g. \"total spending\"")
                        .num_args(1..)
                        .required(true),
                ),
        )
        .subcommand(Command::new("list").about("List transactions."))
        .subcommand(subcommand_add())
        .subcommand(subcommand_delete())
        .subcommand(subcommand_chart())
}
