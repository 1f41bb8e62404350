use cadcore::{
    ac::session::SessionToken,
    goal::GoalFields,
    task::{
        parse_date,
        Priority,
        Recurrence,
        TaskFields,
        TaskOrder,
        TaskQuery,
        TaskStatus,
    },
};
use cadctrl::{
    handle::UserCtrl,
    platform::{
        Builder as PlatformBuilder,
        Platform,
    },
};
use chrono::{
    Datelike,
    NaiveDate,
};
use clap::{
    Parser,
    Subcommand,
};
use serde::Serialize;

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(flatten)]
    platform_builder: PlatformBuilder,
    #[clap(long, value_name = "CADENCE_SESSION", env = "CADENCE_SESSION")]
    session: Option<SessionToken>,
    #[clap(long)]
    json: bool,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the single administrator account.
    #[command(arg_required_else_help = true)]
    Register {
        email: String,
        #[clap(long, env = "CADENCE_PASSWORD")]
        password: String,
        #[clap(long, default_value = "")]
        name: String,
    },
    /// Start a session; prints the token to use as CADENCE_SESSION.
    #[command(arg_required_else_help = true)]
    Login {
        email: String,
        #[clap(long, env = "CADENCE_PASSWORD")]
        password: String,
    },
    Logout,
    Whoami,
    #[command(arg_required_else_help = true)]
    Password {
        #[clap(long)]
        old: String,
        #[clap(long)]
        new: String,
        #[clap(long)]
        confirm: String,
    },
    #[command(arg_required_else_help = true)]
    Task {
        #[command(subcommand)]
        cmd: TaskCmd,
    },
    #[command(arg_required_else_help = true)]
    Goal {
        #[command(subcommand)]
        cmd: GoalCmd,
    },
    #[command(arg_required_else_help = true)]
    Stats {
        #[command(subcommand)]
        cmd: StatsCmd,
    },
}

#[derive(Debug, Subcommand)]
enum TaskCmd {
    #[command(arg_required_else_help = true)]
    Add {
        title: String,
        #[clap(long)]
        description: Option<String>,
        #[clap(long, value_enum, default_value_t = Recurrence::Once)]
        category: Recurrence,
        #[clap(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        #[clap(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
    },
    List {
        #[clap(long, value_enum)]
        status: Option<TaskStatus>,
        #[clap(long, value_enum)]
        category: Option<Recurrence>,
        /// Only the tasks done for their current period.
        #[clap(long, conflicts_with = "pending")]
        done: bool,
        /// Only the tasks not yet done for their current period.
        #[clap(long)]
        pending: bool,
        /// Oldest first.
        #[clap(long)]
        asc: bool,
        #[clap(long)]
        limit: Option<i64>,
    },
    #[command(arg_required_else_help = true)]
    Show {
        id: i64,
    },
    #[command(arg_required_else_help = true)]
    Edit {
        id: i64,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long, value_enum)]
        category: Option<Recurrence>,
        #[clap(long, value_enum)]
        priority: Option<Priority>,
        #[clap(long, value_parser = parse_date, conflicts_with = "no_due")]
        due: Option<NaiveDate>,
        #[clap(long)]
        no_due: bool,
    },
    #[command(arg_required_else_help = true)]
    Toggle {
        id: i64,
    },
    #[command(arg_required_else_help = true)]
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum GoalCmd {
    #[command(arg_required_else_help = true)]
    Add {
        title: String,
        #[clap(long)]
        description: Option<String>,
        #[clap(long, value_parser = parse_date)]
        deadline: Option<NaiveDate>,
    },
    List {
        /// Only the three most recent goals.
        #[clap(long)]
        recent: bool,
    },
    #[command(arg_required_else_help = true)]
    Edit {
        id: i64,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long, value_parser = parse_date, conflicts_with = "no_deadline")]
        deadline: Option<NaiveDate>,
        #[clap(long)]
        no_deadline: bool,
    },
    #[command(arg_required_else_help = true)]
    Delete {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum StatsCmd {
    Summary,
    /// Daily completion counts for a year, the current one by default.
    Heatmap {
        year: Option<i32>,
    },
    Trend,
    /// The tasks for a day, today by default.
    Agenda {
        #[clap(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

#[async_std::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("cadctrl")
        .module("cadac")
        .module("caddb_sqlite")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let platform = args.platform_builder
        .build()
        .await
        .map_err(anyhow::Error::from_boxed)?;
    let out = Output { json: args.json };

    match args.command {
        Commands::Register { email, password, name } => {
            let identity = platform.register_admin(&email, &password, &name).await?;
            out.show(&identity, |identity| {
                println!("registered admin user id {} <{}>", identity.id, identity.email);
            })?;
        },
        Commands::Login { email, password } => {
            let session = platform.login(&email, &password, "cadence".to_string()).await?;
            let token = session.token();
            out.show(&token, |token| println!("{token}"))?;
        },
        Commands::Logout => {
            let token = args.session.ok_or(cadctrl::error::PlatformError::Unauthorized)?;
            if platform.logout(token).await? {
                println!("logged out");
            } else {
                println!("no such session");
            }
        },
        Commands::Whoami => {
            let identity = platform.identify(args.session).await?;
            out.show(&identity, |identity| println!("{identity}"))?;
        },
        Commands::Password { old, new, confirm } => {
            let identity = platform.identify(args.session).await?;
            let user = platform.ac_platform
                .get_user(identity.id)
                .await?
                .ok_or(cadctrl::error::PlatformError::Unauthorized)?;
            user.update_password(&old, &new, &confirm).await?;
            println!("password updated");
        },
        Commands::Task { cmd } => {
            let ctrl = platform.user_ctrl(args.session).await?;
            parse_task(&platform, &ctrl, &out, cmd).await?;
        },
        Commands::Goal { cmd } => {
            let ctrl = platform.user_ctrl(args.session).await?;
            parse_goal(&ctrl, &out, cmd).await?;
        },
        Commands::Stats { cmd } => {
            let ctrl = platform.user_ctrl(args.session).await?;
            parse_stats(&platform, &ctrl, &out, cmd).await?;
        },
    }

    Ok(())
}

struct Output {
    json: bool,
}

impl Output {
    fn show<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text(value);
        }
        Ok(())
    }
}

fn mark(done: bool) -> &'static str {
    done.then_some("x").unwrap_or(" ")
}

async fn parse_task<'p>(
    platform: &'p Platform,
    ctrl: &UserCtrl<'p>,
    out: &Output,
    arg: TaskCmd,
) -> anyhow::Result<()> {
    match arg {
        TaskCmd::Add { title, description, category, priority, due } => {
            let task = ctrl.create_task(TaskFields {
                title,
                description,
                recurrence: category,
                priority,
                due_date: due,
            }).await?;
            out.show(task.task(), |task| println!("created task {task}"))?;
        },
        TaskCmd::List { status, category, done, pending, asc, limit } => {
            let query = TaskQuery {
                status,
                recurrence: category,
                order: if asc { TaskOrder::CreatedAsc } else { TaskOrder::CreatedDesc },
                limit,
            };
            let tasks = match (done, pending) {
                (true, _) => ctrl.list_tasks_by_completion(&query, true).await?,
                (_, true) => ctrl.list_tasks_by_completion(&query, false).await?,
                _ => ctrl.list_tasks(&query).await?.into_iter().collect(),
            };
            let now = platform.now();
            out.show(&tasks, |tasks| {
                for task in tasks.iter() {
                    let done = cadcore::completion::is_completed_now(
                        task, now, platform.calendar());
                    println!("[{}] {task}", mark(done));
                }
            })?;
        },
        TaskCmd::Show { id } => {
            let task = ctrl.get_task(id).await?;
            let done = task.is_completed_now();
            out.show(task.task(), |task| {
                println!("[{}] {task}", mark(done));
                if let Some(description) = &task.description {
                    println!("    {description}");
                }
                for completion in task.completions().iter() {
                    println!("    completed {completion}");
                }
            })?;
        },
        TaskCmd::Edit { id, title, description, category, priority, due, no_due } => {
            let mut task = ctrl.get_task(id).await?;
            let mut fields = task.task().fields();
            if let Some(title) = title {
                fields.title = title;
            }
            if description.is_some() {
                fields.description = description;
            }
            if let Some(category) = category {
                fields.recurrence = category;
            }
            if let Some(priority) = priority {
                fields.priority = priority;
            }
            if due.is_some() || no_due {
                fields.due_date = due;
            }
            task.update(fields).await?;
            out.show(task.task(), |task| println!("updated task {task}"))?;
        },
        TaskCmd::Toggle { id } => {
            let outcome = ctrl.toggle_task(id).await?;
            out.show(&outcome, |outcome| {
                let state = outcome.completed
                    .then_some("done")
                    .unwrap_or("not done");
                println!("task {id} is now {state}");
            })?;
        },
        TaskCmd::Delete { id } => {
            ctrl.delete_task(id).await?;
            println!("deleted task {id}");
        },
    }
    Ok(())
}

async fn parse_goal(
    ctrl: &UserCtrl<'_>,
    out: &Output,
    arg: GoalCmd,
) -> anyhow::Result<()> {
    match arg {
        GoalCmd::Add { title, description, deadline } => {
            let goal = ctrl.create_goal(GoalFields {
                title,
                description,
                deadline,
            }).await?;
            out.show(&goal, |goal| println!("created goal {goal}"))?;
        },
        GoalCmd::List { recent } => {
            let goals = if recent {
                ctrl.recent_goals().await?
            } else {
                ctrl.list_goals(None).await?
            };
            out.show(&goals, |goals| {
                for goal in goals.iter() {
                    println!("{goal}");
                }
            })?;
        },
        GoalCmd::Edit { id, title, description, deadline, no_deadline } => {
            let goal = ctrl.get_goal(id).await?;
            let fields = GoalFields {
                title: title.unwrap_or(goal.title),
                description: description.or(goal.description),
                deadline: if deadline.is_some() || no_deadline {
                    deadline
                } else {
                    goal.deadline
                },
            };
            let goal = ctrl.update_goal(id, fields).await?;
            out.show(&goal, |goal| println!("updated goal {goal}"))?;
        },
        GoalCmd::Delete { id } => {
            ctrl.delete_goal(id).await?;
            println!("deleted goal {id}");
        },
    }
    Ok(())
}

async fn parse_stats<'p>(
    platform: &'p Platform,
    ctrl: &UserCtrl<'p>,
    out: &Output,
    arg: StatsCmd,
) -> anyhow::Result<()> {
    match arg {
        StatsCmd::Summary => {
            let summary = ctrl.summary().await?;
            out.show(&summary, |summary| {
                println!(
                    "{} tasks, {} completed, {} pending ({}%)",
                    summary.total,
                    summary.completed,
                    summary.pending,
                    summary.completion_rate,
                );
            })?;
        },
        StatsCmd::Heatmap { year } => {
            let year = year.unwrap_or_else(|| platform.calendar()
                .date(platform.now())
                .year());
            let days = ctrl.heatmap(year).await?;
            out.show(&days, |days| {
                for day in days.iter().filter(|day| day.count > 0) {
                    println!("{} {:>3} {:?}", day.date, day.count, day.intensity);
                }
            })?;
        },
        StatsCmd::Trend => {
            let months = ctrl.trend().await?;
            out.show(&months, |months| {
                for month in months.iter() {
                    let counts = Recurrence::ALL.iter()
                        .map(|r| format!(
                            "{r}={}",
                            month.counts.get(r).copied().unwrap_or(0),
                        ))
                        .collect::<Vec<_>>()
                        .join(" ");
                    println!("{:04}-{:02} {counts}", month.year, month.month);
                }
            })?;
        },
        StatsCmd::Agenda { date } => {
            let tasks = ctrl.agenda(date).await?;
            let now = platform.now();
            out.show(&tasks, |tasks| {
                for task in tasks.iter() {
                    let done = cadcore::completion::is_completed_now(
                        task, now, platform.calendar());
                    println!("[{}] {task}", mark(done));
                }
            })?;
        },
    }
    Ok(())
}
