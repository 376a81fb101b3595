use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worktrack_client::api::{ApiClient, Purpose};
use worktrack_client::config::Config;
use worktrack_client::device::{Camera, Coordinates, FileCamera, LocationProvider, ManualLocation};
use worktrack_client::pages::attendance::AttendanceViewModel;
use worktrack_client::pages::dashboard::DashboardViewModel;
use worktrack_client::pages::login::LoginViewModel;
use worktrack_client::pages::profile::ProfileViewModel;
use worktrack_client::pages::records::RecordsViewModel;
use worktrack_client::pages::splash::SplashViewModel;
use worktrack_client::pages::{Notice, NoticeLevel};
use worktrack_client::router::{Navigator, Route};
use worktrack_client::state::SessionStore;

#[derive(Parser, Debug)]
#[command(name = "worktrack", about = "WorkTrack field-attendance client")]
struct Args {
    /// Override the attendance service base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// JPEG file used as the camera source for selfie capture.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Latitude reported by the manual position source.
    #[arg(long, requires = "longitude")]
    latitude: Option<f64>,

    /// Longitude reported by the manual position source.
    #[arg(long, requires = "latitude")]
    longitude: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worktrack_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = match &args.base_url {
        Some(url) => Config::with_base_url(url.clone()),
        None => Config::load(),
    };
    tracing::info!(api_base_url = %config.api_base_url, "starting worktrack client");

    let session = SessionStore::new();
    let api = ApiClient::new(&config, session);
    let camera: Arc<dyn Camera> = Arc::new(FileCamera::new(args.photo));
    let coords = match (args.latitude, args.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };
    let location: Arc<dyn LocationProvider> = Arc::new(ManualLocation::new(coords));

    run_shell(api, camera, location).await;
    Ok(())
}

async fn run_shell(api: ApiClient, camera: Arc<dyn Camera>, location: Arc<dyn LocationProvider>) {
    let mut nav = Navigator::new();
    loop {
        let keep_going = match nav.current() {
            Route::Splash => run_splash(&mut nav),
            Route::Login => run_login(&api, &camera, &location, &mut nav).await,
            Route::Dashboard => run_dashboard(&api, &mut nav).await,
            Route::Profile => run_profile(&api, &mut nav).await,
            Route::Attendance => run_attendance(&api, &camera, &location, &mut nav).await,
            Route::AttendanceRecords => run_records(&api, &mut nav).await,
        };
        if !keep_going {
            break;
        }
    }
}

fn run_splash(nav: &mut Navigator) -> bool {
    let mut splash = SplashViewModel::new();
    splash.prepare();
    println!("WorkTrack — Simplifying field work");
    if prompt("press enter to continue").is_none() {
        return false;
    }
    splash.continue_to_login(nav);
    true
}

async fn run_login(
    api: &ApiClient,
    camera: &Arc<dyn Camera>,
    location: &Arc<dyn LocationProvider>,
    nav: &mut Navigator,
) -> bool {
    println!("\n== Sign in ==");
    let mut vm = LoginViewModel::new(api.clone(), camera.clone(), location.clone());
    let Some(email) = prompt("email") else {
        return false;
    };
    let Some(password) = prompt("password") else {
        return false;
    };
    vm.email = email;
    vm.password = password;
    vm.submit(nav).await;
    render_notices(&vm.drain_notices());
    if let Some(error) = &vm.error {
        println!("{}", error);
    }
    true
}

async fn run_dashboard(api: &ApiClient, nav: &mut Navigator) -> bool {
    let mut vm = DashboardViewModel::new(api.clone());
    vm.load().await;
    loop {
        println!("\n== Dashboard ==");
        println!("{}", vm.greeting());
        println!("date: {}", vm.selected_date);
        if let Some(error) = &vm.error {
            println!("{}", error);
        } else {
            let daily = vm.daily_records();
            if daily.is_empty() {
                println!("No attendance for this day");
            }
            for record in daily {
                println!(
                    "  #{} {} @ {}, {} — {}",
                    record.id,
                    record.purpose_line(),
                    record.lat,
                    record.lng,
                    record.timestamp
                );
            }
        }
        let Some(command) = prompt("dashboard [prev|next|today|capture|records|profile|logout|quit]")
        else {
            return false;
        };
        match command.as_str() {
            "prev" => vm.change_day(-1),
            "next" => vm.change_day(1),
            "today" => vm.select_today(),
            "capture" => nav.navigate(Route::Attendance),
            "records" => nav.navigate(Route::AttendanceRecords),
            "profile" => nav.navigate(Route::Profile),
            "logout" => vm.logout(nav),
            "quit" => return false,
            _ => continue,
        }
        if nav.current() != Route::Dashboard {
            vm.leave();
            return true;
        }
    }
}

async fn run_attendance(
    api: &ApiClient,
    camera: &Arc<dyn Camera>,
    location: &Arc<dyn LocationProvider>,
    nav: &mut Navigator,
) -> bool {
    let mut vm = AttendanceViewModel::new(api.clone(), camera.clone(), location.clone());
    vm.enter().await;
    loop {
        println!("\n== Mark Attendance ==");
        if vm.camera_blocked() {
            println!("Camera permission denied");
        }
        println!(
            "selfie: {}",
            vm.photo.as_ref().map(|photo| photo.uri.as_str()).unwrap_or("<none>")
        );
        match vm.coords {
            Some(coords) => println!("coordinates: {:.6}, {:.6}", coords.latitude, coords.longitude),
            None => println!("coordinates: fetching location..."),
        }
        match vm.form.purpose {
            Some(purpose) => println!("purpose: {}", purpose),
            None => println!("purpose: <none> (options: {})", purpose_options()),
        }

        let Some(command) = prompt("attendance [capture|retake|purpose <p>|details <text>|submit|back]")
        else {
            return false;
        };
        match command.as_str() {
            "capture" => vm.capture_selfie().await,
            "retake" => vm.retake(),
            "submit" => vm.submit(nav).await,
            "back" => {
                nav.back();
            }
            other => {
                if let Some(purpose) = other.strip_prefix("purpose ") {
                    match purpose.parse::<Purpose>() {
                        Ok(purpose) => vm.form.select_purpose(purpose),
                        Err(err) => println!("{}", err),
                    }
                } else if let Some(details) = other.strip_prefix("details ") {
                    vm.form.set_details(details);
                }
            }
        }
        render_notices(&vm.drain_notices());
        if nav.current() != Route::Attendance {
            return true;
        }
    }
}

async fn run_records(api: &ApiClient, nav: &mut Navigator) -> bool {
    let mut vm = RecordsViewModel::new(api.clone());
    vm.load().await;
    loop {
        println!("\n== Attendance Records ==");
        if let Some(error) = &vm.error {
            println!("{}", error);
        }
        for row in vm.rows() {
            println!(
                "  #{} {} @ {}, {} — {}",
                row.record.id,
                row.record.purpose_line(),
                row.record.lat,
                row.record.lng,
                row.record.timestamp
            );
            if let Some(distance) = &row.distance_label {
                println!("      distance: {}", distance);
            }
        }
        let Some(command) = prompt("records [refresh|home|profile|back|quit]") else {
            return false;
        };
        match command.as_str() {
            "refresh" => vm.load().await,
            "home" => nav.reset(Route::Dashboard),
            "profile" => nav.navigate(Route::Profile),
            "back" => {
                nav.back();
            }
            "quit" => return false,
            _ => continue,
        }
        if nav.current() != Route::AttendanceRecords {
            vm.leave();
            return true;
        }
    }
}

async fn run_profile(api: &ApiClient, nav: &mut Navigator) -> bool {
    let mut vm = ProfileViewModel::new(api.clone());
    vm.load().await;
    loop {
        println!("\n== Profile ==");
        if let Some(error) = &vm.error {
            println!("{}", error);
        } else {
            println!("{}", vm.display_name());
            for (label, value) in vm.rows() {
                println!("  {}: {}", label, value);
            }
        }
        let Some(command) = prompt("profile [home|logout|back|quit]") else {
            return false;
        };
        match command.as_str() {
            "home" => nav.reset(Route::Dashboard),
            "logout" => vm.logout(nav),
            "back" => {
                nav.back();
            }
            "quit" => return false,
            _ => continue,
        }
        if nav.current() != Route::Profile {
            vm.leave();
            return true;
        }
    }
}

fn purpose_options() -> String {
    Purpose::ALL
        .iter()
        .map(Purpose::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_notices(notices: &[Notice]) {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "!!",
        };
        match &notice.detail {
            Some(detail) => println!("[{}] {}: {}", tag, notice.title, detail),
            None => println!("[{}] {}", tag, notice.title),
        }
    }
}

/// Reads one trimmed line from stdin; `None` means end of input.
fn prompt(label: &str) -> Option<String> {
    print!("{}> ", label);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}
