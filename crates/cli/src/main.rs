//! `skinmorph`, the command-line client for the SkinMorph API.
//!
//! Thin shell over the session controller and the workflow components.
//! Every command runs the same navigation guard the views use, so a
//! signed-out or wrongly-roled invocation redirects instead of hitting
//! the remote API.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use api_gateway::{ApiGateway, GatewayConfig, ImageUpload};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand, ValueEnum};
use credential_store::{default_state_dir, CredentialStore, FileStore};
use session_controller::{check, Access, SessionController, View};
use skinmorph_common::auth::SignupRequest;
use skinmorph_common::Role;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use workflows::timeline::{lesion_heading, observation_line, EMPTY_LESION_MESSAGE, EMPTY_TIMELINE_MESSAGE};
use workflows::{
    referral, PatientRoster, SimulationDriver, TimelineAggregator, WorkflowPayload, WorkflowRelay,
};

#[derive(Parser)]
#[command(name = "skinmorph", about = "SkinMorph skin-lesion client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new account. Does not sign in.
    Signup {
        email: String,
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        gender: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Patient)]
        role: RoleArg,
    },
    /// Sign in and persist the credentials.
    Login { email: String, password: String },
    /// Sign out and clear persisted credentials.
    Logout,
    /// Show the currently signed-in identity.
    Whoami,
    /// Analyze a lesion image.
    Capture {
        image: PathBuf,
        /// Write the Grad-CAM overlay PNG here, when the server returns one.
        #[arg(long)]
        overlay_out: Option<PathBuf>,
    },
    /// Run the future-risk simulation from a single image.
    Simulate {
        image: PathBuf,
        /// Number of copies of the image to submit as the frame sequence.
        #[arg(long, default_value_t = 3)]
        frames: usize,
    },
    /// Show the lesion timeline.
    Timeline,
    /// List patients (clinician accounts only).
    Patients,
    /// Show a patient's stored analyses (clinician accounts only).
    Patient { id: String },
    /// Download the referral report PDF.
    Report {
        #[arg(long, default_value = "skinmorph_report.pdf")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Patient,
    Dermatologist,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Role {
        match arg {
            RoleArg::Patient => Role::Patient,
            RoleArg::Dermatologist => Role::Clinician,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skinmorph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let store = Arc::new(FileStore::open(default_state_dir())?) as Arc<dyn CredentialStore>;
    let config = GatewayConfig::from_env()?;
    info!("Using API at {}", config.base_url);
    let gateway = Arc::new(ApiGateway::new(config, store.clone()));
    let session = SessionController::new(store, gateway.clone());
    session.initialize()?;

    match cli.command {
        Command::Signup {
            email,
            password,
            name,
            age,
            gender,
            role,
        } => {
            let response = session
                .sign_up(&SignupRequest {
                    email,
                    password,
                    name,
                    age,
                    gender,
                    role: role.into(),
                })
                .await?;
            println!("{} (account {})", response.message, response.user_id);
            println!("Sign in with: skinmorph login {} <password>", response.email);
        }

        Command::Login { email, password } => {
            let identity = session.sign_in(&email, &password).await?;
            let landing = match identity.role {
                Role::Clinician => View::ClinicianDashboard,
                Role::Patient => View::Onboarding,
            };
            println!("Signed in as {} ({})", identity.name, identity.role);
            println!("-> {}", landing);
        }

        Command::Logout => {
            let next = session.sign_out()?;
            println!("Signed out.");
            println!("-> {}", next);
        }

        Command::Whoami => match session.current_identity() {
            Some(identity) => {
                println!("{} ({}, id {})", identity.name, identity.role, identity.id)
            }
            None => println!("Not signed in."),
        },

        Command::Capture { image, overlay_out } => {
            guard_to(&session, View::Capture)?;
            let upload = load_image(&image)?;
            let outcome = gateway.predict(upload).await?;

            // The capture and result steps hand the outcome over through a
            // relay chain, the same way the views do.
            let relay = WorkflowRelay::new();
            let token = relay.attach(WorkflowPayload {
                outcome,
                original_image: image.display().to_string(),
            });
            let payload = relay
                .read(&token)
                .context("analysis result was not carried to the result step")?;
            print_capture_result(&payload, overlay_out.as_deref())?;
            relay.finish(&token);
        }

        Command::Simulate { image, frames } => {
            guard_to(&session, View::Simulator)?;
            let frame = load_image(&image)?;
            let mut driver = SimulationDriver::new(gateway);
            let trajectory = driver.run_demo(frame, frames).await?;

            for timepoint in trajectory.ordered_timepoints() {
                if let Some(scores) = trajectory.risks.get(timepoint) {
                    println!(
                        "{:>4}  pigmentation {:.0}%  acne {:.0}%  wrinkles {:.0}%",
                        timepoint,
                        scores.pigmentation_risk * 100.0,
                        scores.acne_risk * 100.0,
                        scores.wrinkle_risk * 100.0,
                    );
                }
            }
        }

        Command::Timeline => {
            guard_to(&session, View::Timeline)?;
            let mut aggregator = TimelineAggregator::new(gateway);
            aggregator.load().await?;

            if aggregator.is_empty() {
                println!("{}", EMPTY_TIMELINE_MESSAGE);
            } else {
                for lesion in aggregator.lesions() {
                    println!("{}", lesion_heading(lesion));
                    if lesion.events.is_empty() {
                        println!("  {}", EMPTY_LESION_MESSAGE);
                    }
                    for event in &lesion.events {
                        println!("  {}  {}", event.captured_at, observation_line(event));
                    }
                }
            }
        }

        Command::Patients => {
            guard_to(&session, View::ClinicianDashboard)?;
            let roster = PatientRoster::new(gateway);
            let patients = roster.load_patients().await?;
            if patients.is_empty() {
                println!("No patients yet.");
            }
            for patient in patients {
                println!(
                    "{}  {} <{}>  {} / {}",
                    patient.id, patient.name, patient.email, patient.age, patient.gender
                );
            }
        }

        Command::Patient { id } => {
            guard_to(&session, View::ClinicianDashboard)?;
            let roster = PatientRoster::new(gateway);
            let history = roster.load_predictions(&id).await?;
            println!("{} stored analyses", history.count);
            for record in history.predictions {
                println!(
                    "{}  {}  {} ({:.1}%)",
                    record.created_at,
                    record.predicted_disease,
                    record.severity,
                    record.confidence * 100.0,
                );
            }
        }

        Command::Report { out } => {
            guard_to(&session, View::Referral)?;
            let bytes = referral::fetch_report(&gateway).await?;
            fs::write(&out, bytes)?;
            println!("Report written to {}", out.display());
        }
    }

    Ok(())
}

/// Render the result step from the relayed payload.
fn print_capture_result(payload: &WorkflowPayload, overlay_out: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", result_heading(payload));
    for rec in &payload.outcome.recommendations {
        println!();
        println!("{} [{}]", rec.title, rec.evidence_level);
        println!("  {}", rec.summary);
        println!("  See a doctor: {}", rec.when_to_see_doctor);
    }

    if let Some(out) = overlay_out {
        match &payload.outcome.prediction.gradcam_overlay_png_b64 {
            Some(b64) => {
                let png = STANDARD
                    .decode(b64)
                    .context("server returned an undecodable overlay")?;
                fs::write(out, png)?;
                println!();
                println!("Overlay written to {}", out.display());
            }
            None => println!("No overlay returned for this image."),
        }
    }
    Ok(())
}

fn result_heading(payload: &WorkflowPayload) -> String {
    let top = &payload.outcome.prediction.top_class;
    format!("{} — {}", top.label, top.probability_percent())
}

/// Run the navigation guard the views use before a command touches the
/// remote API.
fn guard_to(session: &SessionController, view: View) -> anyhow::Result<()> {
    match check(session.current_identity().as_ref(), view) {
        Access::Allow => Ok(()),
        Access::RedirectTo(View::Login) => {
            bail!("not signed in; run `skinmorph login <email> <password>` first")
        }
        Access::RedirectTo(target) => bail!("not available for this account; go to {}", target),
    }
}

fn load_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes =
        fs::read(path).with_context(|| format!("could not read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("frame.png")
        .to_string();
    let content_type = match path.extension().and_then(OsStr::to_str) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "image/png",
    };

    Ok(ImageUpload {
        file_name,
        content_type: content_type.to_string(),
        bytes,
    })
}
