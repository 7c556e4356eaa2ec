use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use musichub_core::domain::{Source, SourceType};
use musichub_core::services::{RegisterTrack, SubmittedMetadata};
use musichub_lib::{App, EnrichmentDto, LoggingConfig, RegistrationDto, TrackInfoDto};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Catálogo musical con reconciliación de fuentes externas.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Register a track by ISRC, fetching metadata from the sources unless given
  RegisterTrack {
    isrc: String,
    /// Track title (requires at least one --artist)
    #[arg(long)]
    title: Option<String>,
    /// Credited artist, repeatable
    #[arg(long = "artist")]
    artists: Vec<String>,
    /// Origin of the submitted metadata as TYPE:ID (defaults to MANUAL:<isrc>)
    #[arg(long)]
    source: Option<Source>,
    /// Correlation id propagated from the caller
    #[arg(long, env = "MUSICHUB_CORRELATION_ID")]
    correlation_id: Option<String>,
  },
  /// Verify an artist against the sources, in artist priority order
  EnrichArtist { name: String },
  /// List the most recently registered tracks
  RecentTracks {
    #[arg(short, long)]
    limit: Option<usize>,
  },
  /// Show a producer and its tracks
  ShowProducer { code: String },
  /// Show a stored artist
  ShowArtist { name: String },
}

fn init_tracing() {
  let default = LoggingConfig::load().unwrap_or_default();
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default.filter));
  tracing_subscriber::registry().with(fmt::layer().with_target(true).with_writer(std::io::stderr)).with(filter).init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

fn register_command(
  isrc: String,
  title: Option<String>,
  artists: Vec<String>,
  source: Option<Source>,
) -> anyhow::Result<RegisterTrack> {
  let command = RegisterTrack::new(isrc.clone());
  match title {
    None if artists.is_empty() && source.is_none() => Ok(command),
    None => bail!("--artist and --source need --title"),
    Some(_) if artists.is_empty() => bail!("--title needs at least one --artist"),
    Some(title) => {
      let source = match source {
        Some(source) => source,
        None => Source::new(SourceType::Manual, &isrc)?,
      };
      Ok(command.with_metadata(SubmittedMetadata { title, artist_names: artists, source }))
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing();

  let mut app = App::from_config().context("failed to initialise musichub")?;

  match cli.command {
    Command::RegisterTrack { isrc, title, artists, source, correlation_id } => {
      let mut command = register_command(isrc, title, artists, source)?;
      if let Some(id) = correlation_id {
        command = command.with_correlation_id(id);
      }
      let registration = app.register_track(command).await?;
      print_json(&RegistrationDto::from(&registration))
    }
    Command::EnrichArtist { name } => {
      let (artist, state) = app.enrich_artist(&name).await?;
      print_json(&EnrichmentDto::new(&artist, &state))
    }
    Command::RecentTracks { limit } => {
      let tracks = app.recent_tracks(limit)?;
      print_json(&tracks.iter().map(TrackInfoDto::from).collect::<Vec<_>>())
    }
    Command::ShowProducer { code } => match app.find_producer(&code)? {
      Some(producer) => print_json(&producer),
      None => bail!("producer {code} not found"),
    },
    Command::ShowArtist { name } => match app.find_artist(&name)? {
      Some(artist) => print_json(&artist),
      None => bail!("artist '{}' not found", name.trim()),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_parses_repeated_artists_and_source() {
    let cli = Cli::try_parse_from([
      "musichub",
      "register-track",
      "FRLA12400001",
      "--title",
      "One More Time",
      "--artist",
      "Daft Punk",
      "--artist",
      "Romanthony",
      "--source",
      "spotify:sp-1",
    ])
    .unwrap();

    let Command::RegisterTrack { artists, source, .. } = cli.command else { panic!("wrong subcommand") };
    assert_eq!(artists, ["Daft Punk", "Romanthony"]);
    assert_eq!(source, Some(Source::new(SourceType::Spotify, "sp-1").unwrap()));
  }

  #[test]
  fn title_without_artist_is_rejected() {
    assert!(register_command("FRLA12400001".into(), Some("X".into()), vec![], None).is_err());
    assert!(register_command("FRLA12400001".into(), None, vec!["A".into()], None).is_err());
  }

  #[test]
  fn submitted_metadata_defaults_to_a_manual_source() {
    let command = register_command("FRLA12400001".into(), Some("X".into()), vec!["A".into()], None).unwrap();
    let metadata = command.metadata.unwrap();
    assert_eq!(metadata.source, Source::new(SourceType::Manual, "FRLA12400001").unwrap());
  }

  #[test]
  fn bare_isrc_leaves_metadata_to_the_sources() {
    let command = register_command("FRLA12400001".into(), None, vec![], None).unwrap();
    assert!(command.metadata.is_none());
  }
}
