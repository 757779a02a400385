//! Builds a small compass-and-straightedge pattern and walks it end to end:
//! arrangement, junction untangling, loop tracing and inset.
//!
//! Usage:
//! ```text
//! cargo run --example pattern
//! RUST_LOG=girih=debug cargo run --example pattern
//! ```

use girih::geometry::{Circle, Line, Path, Primitive};
use girih::math::Coord;
use girih::operations::arrangement::BuildArrangement;
use girih::operations::inset::{CornerJoin, InsetOptions};
use girih::operations::untangle::HitTransition;
use girih::operations::{FindNextSegments, InsetPath, TraceLoop, UntangleHit};
use girih::Result;

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for girih.
    // Override with RUST_LOG env var (e.g. RUST_LOG=girih=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("girih=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let guides = vec![
        Primitive::Line(Line::new(0.0, 0.0)),
        Primitive::Line(Line::new(0.0, 10.0)),
        Primitive::Line(Line::vertical(0.0)),
        Primitive::Line(Line::vertical(10.0)),
        Primitive::Line(Line::new(1.0, 0.0)),
        Primitive::Line(Line::new(-1.0, 10.0)),
        Primitive::Circle(Circle::new(Coord::new(5.0, 5.0), 5.0)),
    ];

    let arrangement = BuildArrangement::new(&guides).execute();
    println!("{} hits", arrangement.hits().len());

    if let Some(center) = arrangement.find_hit(&Coord::new(5.0, 5.0)) {
        match UntangleHit::new(arrangement.incidences_at(center)).execute()? {
            HitTransition::Straight { entry, exit } => {
                println!("center: guide {} -> guide {}", entry.shape_id, exit.shape_id);
            }
            HitTransition::Multi { entries, exits } => {
                for (entry, exit) in entries.iter().zip(&exits) {
                    println!("center: guide {} -> guide {}", entry.shape_id, exit.shape_id);
                }
            }
        }
    }

    let Some(start) = arrangement.find_hit(&Coord::origin()) else {
        println!("no hit at the origin");
        return Ok(());
    };
    let candidates = FindNextSegments::new(start, None, &guides, &arrangement).execute()?;
    for candidate in &candidates {
        println!(
            "from origin: ({:.3}, {:.3}) along guide {}",
            candidate.to.coord.x, candidate.to.coord.y, candidate.primitive
        );
    }

    let Some(first) = candidates.into_iter().next() else {
        return Ok(());
    };
    let Some(shape) = TraceLoop::new(start, first, &guides, &arrangement).execute()? else {
        println!("walk did not close");
        return Ok(());
    };
    print_path("traced", &shape)?;

    let distance = if shape.is_clockwise()? { -0.5 } else { 0.5 };
    let inset = InsetPath::new(&shape, distance).execute()?;
    print_path("inset", &inset)?;

    let mitered = InsetPath::new(&shape, -distance)
        .with_options(InsetOptions {
            join: CornerJoin::Miter,
        })
        .execute()?;
    print_path("outset", &mitered)?;
    Ok(())
}

fn print_path(label: &str, path: &Path) -> Result<()> {
    let points = path.to_points(0.05)?;
    println!(
        "{label}: {} segments, area {:.3}",
        path.segment_count(),
        path.signed_area(0.05)?.abs()
    );
    for p in points {
        println!("  ({:.3}, {:.3})", p.x, p.y);
    }
    Ok(())
}
