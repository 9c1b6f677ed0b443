use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fitplot::api::DEFAULT_BASE_URL;
use fitplot::models::{ActivityUpdate, ListQuery, NewActivity, NewUser, OrderBy, SortBy};
use fitplot::{
    ActivityRecord, ActivitySource, AxisKey, Client, DateRange, PlotRequest, PlotSession,
};
use fitplot::{stats, storage, viz};
use std::cell::RefCell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fitplot",
    version,
    about = "Record, list & plot workouts from a fitness-tracker service"
)]
struct Cli {
    /// Base URL of the tracker service.
    #[arg(long, global = true, env = "FITNESS_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot one user's activities between two dates (and optionally save the chart).
    Plot(PlotArgs),
    /// List activities, optionally for one user (and optionally save them).
    List(ListArgs),
    /// Show one activity by id.
    Show {
        id: i64,
    },
    /// Record a new activity.
    Create(CreateArgs),
    /// Change fields of an existing activity.
    Update(UpdateArgs),
    /// Register a new user.
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// User whose activities are plotted.
    #[arg(short, long)]
    user_id: Option<String>,
    /// First day to include (YYYY-MM-DD).
    #[arg(long, default_value = "1981-01-01")]
    start: String,
    /// Last day to include (YYYY-MM-DD).
    #[arg(long, default_value = "2081-01-01")]
    end: String,
    /// Y-axis field: pace_float_mps or speed_kmphr.
    #[arg(short = 'y', long, default_value = "pace_float_mps")]
    y_axis: String,
    /// X-axis field: distance_km, elevation_m, perceived_effort or date.
    #[arg(short = 'x', long, default_value = "date")]
    x_axis: String,
    /// Render the chart to the given path (.svg or .png).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the chart configuration as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Print y-axis statistics per activity type.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only list activities of this user.
    #[arg(short, long)]
    user_id: Option<String>,
    #[arg(long, default_value_t = SortBy::Id)]
    sort_by: SortBy,
    #[arg(long, default_value_t = OrderBy::Asc)]
    order_by: OrderBy,
    #[arg(long, default_value_t = 0)]
    offset: u32,
    #[arg(long, default_value_t = 10)]
    limit: u32,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    user_id: i64,
    /// Day of the activity (YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,
    /// Start time of day (HH:MM).
    #[arg(long)]
    time: String,
    #[arg(long, default_value = "run")]
    activity: String,
    /// e.g. road or trail
    #[arg(long)]
    activity_type: String,
    /// hh:mm:ss
    #[arg(long)]
    moving_time: String,
    #[arg(long)]
    distance_km: f64,
    /// 1 (very easy) to 10 (maximum effort)
    #[arg(long)]
    perceived_effort: i32,
    #[arg(long, allow_hyphen_values = true)]
    elevation_m: Option<f64>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: i64,
    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    activity: Option<String>,
    #[arg(long)]
    activity_type: Option<String>,
    #[arg(long)]
    moving_time: Option<String>,
    #[arg(long)]
    distance_km: Option<f64>,
    #[arg(long)]
    perceived_effort: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    elevation_m: Option<f64>,
}

/// Passes requests through to the client and keeps the last response for `--stats`.
struct Recording<'a> {
    client: &'a Client,
    rows: RefCell<Vec<ActivityRecord>>,
}

impl ActivitySource for Recording<'_> {
    fn activities_to_plot(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> Result<Vec<ActivityRecord>> {
        let rows = self.client.activities_to_plot(user_id, range)?;
        *self.rows.borrow_mut() = rows.clone();
        Ok(rows)
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 2 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.2}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn print_activity(r: &ActivityRecord) {
    println!(
        "#{:<5} user={:<4} {} {:<5} {} ({})  {} km in {}  elevation={} m  effort={}  pace={}  speed={}",
        r.id,
        r.user_id,
        r.date,
        r.time,
        r.activity,
        r.activity_type,
        fmt_opt(Some(r.distance_km)),
        r.moving_time,
        fmt_opt(r.elevation_m),
        r.perceived_effort,
        fmt_opt(r.pace_float_mps),
        fmt_opt(r.speed_kmphr),
    );
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let client = Client::new(cli.api_url.as_str())?;
    match cli.cmd {
        Command::Plot(args) => cmd_plot(&client, args),
        Command::List(args) => cmd_list(&client, args),
        Command::Show { id } => {
            print_activity(&client.get_activity(id)?);
            Ok(())
        }
        Command::Create(args) => cmd_create(&client, args),
        Command::Update(args) => cmd_update(&client, args),
        Command::CreateUser { name, email } => {
            let user = client.create_user(&NewUser { name, email })?;
            println!("Created user {} ({} <{}>)", user.id, user.name, user.email);
            Ok(())
        }
    }
}

fn cmd_plot(client: &Client, args: PlotArgs) -> Result<()> {
    let request = PlotRequest {
        user_id: args.user_id.unwrap_or_default(),
        start_date: args.start,
        end_date: args.end,
        y_axis: args.y_axis,
        x_axis: args.x_axis,
    };
    let source = Recording {
        client,
        rows: RefCell::new(Vec::new()),
    };
    let mut session = PlotSession::new();
    let chart = match session.submit(&source, &request).cloned() {
        Ok(chart) => chart,
        Err(err) => bail!("{} ({err})", session.message().unwrap_or("plot failed")),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chart.to_chart_config())?);
    } else {
        println!("{}: {} points", chart.title(), chart.points().len());
    }

    if let Some(path) = args.out.as_ref() {
        viz::render_chart(&chart, path, args.width, args.height)?;
        eprintln!("Wrote plot to {}", path.display());
    }

    if args.stats {
        let axis: AxisKey = request.y_axis.parse()?;
        for s in stats::grouped_summary(&source.rows.borrow(), axis) {
            println!(
                "{} ({}) • {}  count={} missing={}  min={} max={} mean={} median={}",
                s.key.activity,
                s.key.activity_type,
                s.axis,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }
    Ok(())
}

fn cmd_list(client: &Client, args: ListArgs) -> Result<()> {
    let query = ListQuery {
        offset: args.offset,
        limit: args.limit,
        sort_by: args.sort_by,
        order_by: args.order_by,
    };
    let rows = match args.user_id.as_deref().map(str::trim) {
        Some(user) if !user.is_empty() => client.list_user_activities(user, &query)?,
        _ => client.list_activities(&query)?,
    };
    for r in &rows {
        print_activity(r);
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&rows, path)?,
            "json" => storage::save_json(&rows, path)?,
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", rows.len(), path.display());
    }
    Ok(())
}

fn cmd_create(client: &Client, args: CreateArgs) -> Result<()> {
    let new = NewActivity {
        user_id: args.user_id,
        date: args.date,
        time: args.time,
        activity: args.activity,
        activity_type: args.activity_type,
        moving_time: args.moving_time,
        distance_km: args.distance_km,
        perceived_effort: args.perceived_effort,
        elevation_m: args.elevation_m,
    };
    let created = client.create_activity(&new)?;
    eprintln!("Created activity {}", created.id);
    print_activity(&created);
    Ok(())
}

fn cmd_update(client: &Client, args: UpdateArgs) -> Result<()> {
    let update = ActivityUpdate {
        user_id: args.user_id,
        date: args.date,
        time: args.time,
        activity: args.activity,
        activity_type: args.activity_type,
        moving_time: args.moving_time,
        distance_km: args.distance_km,
        perceived_effort: args.perceived_effort,
        elevation_m: args.elevation_m,
    };
    if update.is_empty() {
        bail!("nothing to update: pass at least one field option");
    }
    let updated = client.update_activity(args.id, &update)?;
    eprintln!("Updated activity {}", updated.id);
    print_activity(&updated);
    Ok(())
}
