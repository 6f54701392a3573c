//! Line-oriented command shell over a headless map.

use crate::app::App;
use aoimapper_core::{DrawingMode, FeatureId, LatLon, Viewport};
use aoimapper_designer::PointerOutcome;
use aoimapper_visualizer::RecordingMapView;
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  mode <none|point|line|polygon>   set the drawing mode
  tool <point|line|polygon>        toggle a toolbar tool
  click <lat> <lon>                primary click on the map
  context [<lat> <lon>]            secondary click (finalize)
  pan <lat> <lon> [zoom]           drag the map
  zoom <level> | zoom-in | zoom-out
  layer                            toggle the satellite layer
  list                             show drawn features
  delete <row|id>                  delete a feature
  clear                            delete all features
  search <text>                    search for a place
  select <row>                     centre on a search result
  status                           show map state
  help | quit";

/// Errors from parsing a shell line.
#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid argument '{value}': {reason}")]
    InvalidArgument { value: String, reason: String },
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mode(DrawingMode),
    Tool(DrawingMode),
    Click(LatLon),
    Context(LatLon),
    Pan(LatLon, Option<i32>),
    Zoom(i32),
    ZoomIn,
    ZoomOut,
    Layer,
    List,
    Delete(String),
    Clear,
    Search(String),
    Select(usize),
    Status,
    Help,
    Quit,
}

fn number<T: FromStr>(value: Option<&str>, command: &'static str) -> Result<T, CommandError>
where
    T::Err: std::fmt::Display,
{
    let value = value.ok_or(CommandError::MissingArgument(command))?;
    value.parse().map_err(|e: T::Err| CommandError::InvalidArgument {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn mode(value: Option<&str>, command: &'static str) -> Result<DrawingMode, CommandError> {
    let value = value.ok_or(CommandError::MissingArgument(command))?;
    value
        .parse()
        .map_err(|reason| CommandError::InvalidArgument {
            value: value.to_string(),
            reason,
        })
}

fn position<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<LatLon, CommandError> {
    let lat = number(args.next(), command)?;
    let lon = number(args.next(), command)?;
    Ok(LatLon::new(lat, lon))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match name {
            "mode" => Command::Mode(mode(args.next(), "mode")?),
            "tool" => Command::Tool(mode(args.next(), "tool")?),
            "click" => Command::Click(position(&mut args, "click")?),
            "context" => {
                if rest.is_empty() {
                    Command::Context(LatLon::new(0.0, 0.0))
                } else {
                    Command::Context(position(&mut args, "context")?)
                }
            }
            "pan" => {
                let center = position(&mut args, "pan")?;
                let zoom = match args.next() {
                    Some(z) => Some(number(Some(z), "pan")?),
                    None => None,
                };
                Command::Pan(center, zoom)
            }
            "zoom" => Command::Zoom(number(args.next(), "zoom")?),
            "zoom-in" => Command::ZoomIn,
            "zoom-out" => Command::ZoomOut,
            "layer" => Command::Layer,
            "list" => Command::List,
            "delete" => Command::Delete(
                args.next()
                    .ok_or(CommandError::MissingArgument("delete"))?
                    .to_string(),
            ),
            "clear" => Command::Clear,
            "search" if !rest.is_empty() => Command::Search(rest.to_string()),
            "search" => return Err(CommandError::MissingArgument("search")),
            "select" => Command::Select(number(args.next(), "select")?),
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn describe(outcome: &PointerOutcome) -> String {
    match outcome {
        PointerOutcome::Ignored => "ignored".to_string(),
        PointerOutcome::Committed(id) => format!("added {}", id),
        PointerOutcome::VertexAdded { pending } => format!("{} pending vertices", pending),
        PointerOutcome::Discarded { pending } => {
            format!("discarded {} pending vertices", pending)
        }
    }
}

/// Resolve a 1-based row number or a full id.
fn resolve_feature(app: &App<RecordingMapView>, key: &str) -> Option<FeatureId> {
    let features = app.store().features();
    if let Ok(row) = key.parse::<usize>() {
        return row
            .checked_sub(1)
            .and_then(|i| features.get(i))
            .map(|f| f.id().clone());
    }
    features
        .iter()
        .find(|f| f.id().as_str() == key)
        .map(|f| f.id().clone())
}

/// Run one command and describe the result.
pub fn execute(app: &mut App<RecordingMapView>, command: Command) -> String {
    match command {
        Command::Mode(mode) => {
            app.set_drawing_mode(mode);
            format!("mode {}", app.store().drawing_mode())
        }
        Command::Tool(mode) => {
            app.toggle_tool(mode);
            format!("mode {}", app.store().drawing_mode())
        }
        Command::Click(at) => describe(&app.click(at)),
        Command::Context(at) => describe(&app.context_click(at)),
        Command::Pan(center, zoom) => {
            let zoom = zoom.unwrap_or(i32::from(app.store().zoom()));
            app.pan_to(Viewport::new(center, zoom));
            format!("view {}", app.store().viewport())
        }
        Command::Zoom(zoom) => {
            app.set_zoom(zoom);
            format!("zoom {}", app.store().zoom())
        }
        Command::ZoomIn => {
            app.zoom_in();
            format!("zoom {}", app.store().zoom())
        }
        Command::ZoomOut => {
            app.zoom_out();
            format!("zoom {}", app.store().zoom())
        }
        Command::Layer => {
            app.toggle_base_layer();
            let panel = app.layer_panel();
            format!(
                "{}: {}",
                panel.base_layer.label,
                if panel.base_layer.visible { "shown" } else { "hidden" }
            )
        }
        Command::List => {
            let panel = app.layer_panel();
            let mut out = panel.header.clone();
            if let Some(empty) = panel.empty_text {
                let _ = write!(out, "\n  {}", empty);
            }
            for (i, row) in panel.rows.iter().enumerate() {
                let _ = write!(out, "\n  {}. {} [{}] {}", i + 1, row.label, row.kind, row.id);
            }
            out
        }
        Command::Delete(key) => match resolve_feature(app, &key) {
            Some(id) => {
                app.delete_feature(&id);
                format!("deleted {}", id)
            }
            None => format!("no feature '{}'", key),
        },
        Command::Clear => {
            app.clear_features();
            "cleared".to_string()
        }
        Command::Search(text) => {
            app.search_input(&text, std::time::Instant::now());
            app.flush_search();
            let rows = app.search().rows();
            if rows.is_empty() {
                return "no results".to_string();
            }
            let mut out = String::new();
            for (i, row) in rows.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let _ = write!(out, "  {}. {} ({})", i + 1, row.title, row.subtitle);
            }
            out
        }
        Command::Select(row) => match row.checked_sub(1).and_then(|i| app.select_result(i)) {
            Some(center) => format!("centred on {}", center),
            None => format!("no result {}", row),
        },
        Command::Status => {
            let store = app.store();
            let view = app.synchronizer().with_view(|v| {
                (v.overlays().len(), v.redraw_count(), v.imagery_attached())
            });
            format!(
                "view {} | mode {} | features {} | pending {} | imagery {} | overlays {} ({} redraws)",
                store.viewport(),
                store.drawing_mode(),
                store.features().len(),
                app.router().pending_vertices().len(),
                if view.2 { "on" } else { "off" },
                view.0,
                view.1
            )
        }
        Command::Help => HELP.to_string(),
        Command::Quit => "bye".to_string(),
    }
}
