use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use personnel_core::{
    ApiConfig, BearerAuth, DetailState, DetailView, ListQuery, NewPerson, PersonApi, PersonPatch,
    PersonStatus, UreqTransport,
};

mod render;

/// Command-line front end for the personnel service
#[derive(Parser, Debug)]
#[clap(name = "personnel")]
struct Cli {
    /// Base URL of the backend. Falls back to PERSONNEL_API_URL, then http://localhost:12306
    #[clap(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds. Falls back to PERSONNEL_API_TIMEOUT_MS, then 10000
    #[clap(long, global = true)]
    timeout_ms: Option<u64>,

    /// Bearer token sent with every request
    #[clap(long, global = true, env = "PERSONNEL_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print raw JSON instead of text
    #[clap(long, global = true)]
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List people, with search, filters and pagination
    List(ListArgs),
    /// Show one person
    Show { id: String },
    /// Create a person
    Create(CreateArgs),
    /// Update some fields of a person
    Update {
        id: String,
        #[clap(flatten)]
        fields: UpdateArgs,
    },
    /// Delete one person
    Delete { id: String },
    /// Delete several people at once
    BatchDelete { ids: Vec<String> },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Substring matched against name, email and department
    #[clap(short, long)]
    keyword: Option<String>,
    #[clap(short, long)]
    department: Option<String>,
    #[clap(short, long)]
    status: Option<PersonStatus>,
    #[clap(short, long, default_value = "1")]
    page: u32,
    #[clap(long, default_value = "10")]
    page_size: u32,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[clap(long)]
    name: String,
    #[clap(long)]
    email: String,
    #[clap(long)]
    phone: String,
    #[clap(long)]
    department: String,
    #[clap(long)]
    position: String,
    /// ISO date, e.g. 2024-03-01
    #[clap(long)]
    join_date: String,
    #[clap(long, default_value = "active")]
    status: PersonStatus,
    #[clap(long)]
    location: String,
    #[clap(long)]
    avatar: Option<String>,
    #[clap(long)]
    bio: Option<String>,
    /// Repeat for several skills
    #[clap(long = "skill")]
    skills: Vec<String>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[clap(long)]
    name: Option<String>,
    #[clap(long)]
    email: Option<String>,
    #[clap(long)]
    phone: Option<String>,
    #[clap(long)]
    department: Option<String>,
    #[clap(long)]
    position: Option<String>,
    #[clap(long)]
    join_date: Option<String>,
    #[clap(long)]
    status: Option<PersonStatus>,
    #[clap(long)]
    location: Option<String>,
    #[clap(long)]
    avatar: Option<String>,
    #[clap(long)]
    bio: Option<String>,
    /// Replaces the whole skill list; repeat for several skills
    #[clap(long = "skill")]
    skills: Option<Vec<String>>,
}

impl From<CreateArgs> for NewPerson {
    fn from(args: CreateArgs) -> Self {
        NewPerson {
            name: args.name,
            email: args.email,
            phone: args.phone,
            avatar: args.avatar,
            department: args.department,
            position: args.position,
            join_date: args.join_date,
            status: args.status,
            bio: args.bio,
            skills: if args.skills.is_empty() {
                None
            } else {
                Some(args.skills)
            },
            location: args.location,
        }
    }
}

impl From<UpdateArgs> for PersonPatch {
    fn from(args: UpdateArgs) -> Self {
        PersonPatch {
            name: args.name,
            email: args.email,
            phone: args.phone,
            avatar: args.avatar,
            department: args.department,
            position: args.position,
            join_date: args.join_date,
            status: args.status,
            bio: args.bio,
            skills: args.skills,
            location: args.location,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();

    let mut config = ApiConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    log::debug!("using {config:?}");

    let mut api = PersonApi::from_config(&config);
    if let Some(token) = cli.token {
        api = api.with_interceptor(BearerAuth::new(token));
    }

    run(&api, cli.command, cli.json)
}

fn run(api: &PersonApi<UreqTransport>, command: Command, json: bool) -> Result<()> {
    match command {
        Command::List(args) => {
            let mut query = ListQuery::new();
            query.set_keyword(args.keyword.unwrap_or_default());
            query.set_department(args.department);
            query.set_status(args.status);
            query.set_page_size(args.page_size);
            query.set_page(args.page);
            query.refresh(api);

            if let Some(err) = query.error() {
                eprintln!("warning: {err}");
            }
            if json {
                println!("{}", serde_json::to_string_pretty(query.persons())?);
            } else {
                print!("{}", render::list(query.persons(), &query.pagination()));
            }
        }
        Command::Show { id } => {
            let mut view = DetailView::for_id(id);
            view.refresh(api);
            match view.state() {
                DetailState::Loaded(person) if json => {
                    println!("{}", serde_json::to_string_pretty(person)?)
                }
                DetailState::Loaded(person) => print!("{}", render::detail(person)),
                DetailState::Failed(message) => {
                    bail!("{message} (back to list: `personnel list`)")
                }
                DetailState::Idle | DetailState::Loading => bail!("no person id given"),
            }
        }
        Command::Create(args) => {
            let created = api.create(&args.into())?.data;
            println!("created {} ({})", created.name, created.id);
        }
        Command::Update { id, fields } => {
            let patch = PersonPatch::from(fields);
            if patch.is_empty() {
                bail!("nothing to update, pass at least one field");
            }
            let updated = api.update(&id, &patch)?.data;
            print!("{}", render::detail(&updated));
        }
        Command::Delete { id } => {
            let result = api.remove(&id)?;
            println!("{}", render::outcome(&result));
        }
        Command::BatchDelete { ids } => {
            let result = api.batch_remove(&ids)?;
            println!("{}", render::outcome(&result));
            if !result.success {
                bail!("batch delete did not remove every id");
            }
        }
    }
    Ok(())
}
