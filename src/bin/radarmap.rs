use clap::Parser;
use log::{info, LevelFilter};
use radarmap::{
    open_source, ClusterParams, Coord, RadarEngine, RadarFilter, RadarMapResult, RadarQuery,
    Rankings, Viewport, DEFAULT_RADARS_URL,
};
use simple_logger::SimpleLogger;
use std::{
    fmt::{self, Display},
    path::PathBuf,
};

/*-------------------------------------------------------------------------------------------------
 *                                     Command Line Options
 *-----------------------------------------------------------------------------------------------*/

///
/// Show the traffic radars matching a set of filters and the densest radar zones.
///
/// This program loads the radar list, keeps the radars matching the type and distance filters,
/// restricts them to a map window, and reports up to a few clusters of densely packed radars.
///
#[derive(Debug, Parser)]
#[clap(bin_name = "radarmap")]
#[clap(author, version, about)]
struct RadarMapOptionsInit {
    /// The radar file, either a path or an http(s) URL.
    ///
    /// If this is not specified, then the program will check for it in the "RADAR_SOURCE"
    /// environment variable, and finally fall back to the national open data file.
    #[clap(short, long)]
    #[clap(env = "RADAR_SOURCE")]
    #[clap(default_value = DEFAULT_RADARS_URL)]
    source: String,

    /// Only keep radars whose type contains this text (case insensitive).
    #[clap(short, long)]
    type_filter: Option<String>,

    /// Only keep radars within this many kilometers of the position.
    #[clap(short, long)]
    #[clap(parse(try_from_str=parse_positive))]
    max_distance: Option<f64>,

    /// Your position as lat,lon. Required for the distance filter to have any effect.
    #[clap(short, long)]
    position: Option<Coord>,

    /// The map window as lat,lon,lat_span,lon_span in degrees.
    ///
    /// If this is not specified, then all filtered radars are considered visible.
    #[clap(long)]
    viewport: Option<Viewport>,

    /// Use the default window over France as the viewport.
    #[clap(long, conflicts_with = "viewport")]
    france: bool,

    /// Clustering radius in kilometers.
    #[clap(long, default_value_t = ClusterParams::default().radius_km)]
    #[clap(parse(try_from_str=parse_positive))]
    radius: f64,

    /// Minimum number of radars in a cluster.
    #[clap(long, default_value_t = ClusterParams::default().min_count)]
    min_count: usize,

    /// Maximum number of clusters to report.
    #[clap(long, default_value_t = ClusterParams::default().max_clusters)]
    max_clusters: usize,

    /// A JSON file with per radar rankings to show next to each radar.
    #[clap(short, long)]
    rankings: Option<PathBuf>,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn parse_positive(val: &str) -> Result<f64, String> {
    let val: f64 = val.parse().map_err(|err| format!("{}: {}", val, err))?;

    if !(val.is_finite() && val > 0.0) {
        return Err(format!("Argument must be a positive number: {}", val));
    }

    Ok(val)
}

#[derive(Debug)]
struct RadarMapOptionsChecked {
    /// Where the radar file comes from.
    source: String,

    /// The query to run.
    query: RadarQuery,

    /// Optional per radar rankings.
    rankings: Option<PathBuf>,

    /// Verbose output
    verbose: bool,
}

impl Display for RadarMapOptionsChecked {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let RadarQuery {
            filter,
            viewport,
            params,
        } = &self.query;

        writeln!(f, "\n")?; // yes, two blank lines.
        writeln!(f, "       Source: {}", self.source)?;
        if let Some(type_query) = &filter.type_query {
            writeln!(f, "  Type Filter: {}", type_query)?;
        }
        if let Some(max_km) = filter.max_distance_km {
            writeln!(f, " Max Distance: {} km", max_km)?;
        }
        if let Some(position) = filter.reference {
            writeln!(f, "     Position: {}", position)?;
        }
        if let Some(vp) = viewport {
            writeln!(
                f,
                "     Viewport: {} span {}x{}",
                vp.center, vp.lat_span, vp.lon_span
            )?;
        }
        writeln!(f, "       Radius: {} km", params.radius_km)?;
        writeln!(f, "    Min Count: {}", params.min_count)?;
        writeln!(f, " Max Clusters: {}", params.max_clusters)?;
        writeln!(f, "\n")?; // yes, two blank lines.

        Ok(())
    }
}

/// Get the command line arguments and check them.
fn parse_args() -> RadarMapResult<RadarMapOptionsChecked> {
    let RadarMapOptionsInit {
        source,
        type_filter,
        max_distance,
        position,
        viewport,
        france,
        radius,
        min_count,
        max_clusters,
        rankings,
        verbose,
    } = RadarMapOptionsInit::parse();

    if max_distance.is_some() && position.is_none() {
        log::warn!("--max-distance has no effect without --position");
    }

    if min_count == 0 {
        return Err("--min-count must be at least 1".into());
    }

    let viewport = if france { Some(Viewport::france()) } else { viewport };

    let query = RadarQuery {
        filter: RadarFilter {
            type_query: type_filter,
            max_distance_km: max_distance,
            reference: position,
        },
        viewport,
        params: ClusterParams {
            radius_km: radius,
            min_count,
            max_clusters,
        },
    };

    let checked = RadarMapOptionsChecked {
        source,
        query,
        rankings,
        verbose,
    };

    if verbose {
        info!("{}", checked);
    }

    Ok(checked)
}

/*-------------------------------------------------------------------------------------------------
 *                                             MAIN
 *-----------------------------------------------------------------------------------------------*/
fn main() -> RadarMapResult<()> {
    let verbose = std::env::args().any(|arg| arg == "-v" || arg == "--verbose");
    let crate_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .with_module_level("radarmap", crate_level)
        .init()?;

    let opts = parse_args()?;

    let rankings = match opts.rankings {
        Some(ref path) => Rankings::load(path)?,
        None => Rankings::default(),
    };

    let source = open_source(&opts.source)?;
    let mut engine = RadarEngine::new(source);

    let view = engine.query(&opts.query);
    if let Some(err) = view.load_error {
        log::error!("Unable to load radars ({}).", err.kind());
        return Err(err.into());
    }

    if opts.verbose {
        info!(
            "{} radars match the filters, {} are visible.",
            view.filtered.len(),
            view.visible.len()
        );
    }

    if view.show_markers {
        println!("Radars:");
        for radar in &view.visible {
            match rankings.get(&radar.id) {
                Some(rank) => println!(
                    "  {} rank #{} ({} passages)",
                    radar, rank.user_rank, rank.passages
                ),
                None => println!("  {}", radar),
            }
        }
    } else {
        println!("Zoomed out too far to list {} radars.", view.visible.len());
    }

    println!();
    println!(
        "Densest zones (circles of {:.0} m):",
        view.clusters.display_radius_m()
    );
    if view.clusters.is_empty() {
        println!("  none");
    }
    for cluster in view.clusters.iter() {
        println!("  {}", cluster);
    }

    Ok(())
}
