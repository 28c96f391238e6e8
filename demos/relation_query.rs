use spatialrel_query::{value_map, QueryConfig};
use spatialrel_stats::{PairStat, PairStatistics};

fn main() {
    // Learned statistics: cups sit ~0.8 from plates, ~2.5 from the sink.
    const CUP: u32 = 0;
    const PLATE: u32 = 1;
    const SINK: u32 = 2;

    let mut stats = PairStatistics::unobserved(3, 1_000_000.0);
    stats.set_pair(
        CUP,
        PLATE,
        PairStat {
            mean: 0.8,
            std_dev: 0.3,
            count: 40,
        },
    );
    stats.set_pair(
        CUP,
        SINK,
        PairStat {
            mean: 2.5,
            std_dev: 0.6,
            count: 25,
        },
    );

    let anchors = [(PLATE, [1.0, 1.0]), (SINK, [-1.5, 0.5])];
    let config = QueryConfig {
        half_extent: 4.0,
        cells: 41,
        ..QueryConfig::default()
    };
    let map = match value_map(&stats, CUP, &anchors, &config) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("query failed: {e}");
            return;
        }
    };

    println!(
        "Grid {}x{}, {} contributing anchors",
        map.values().nrows(),
        map.values().ncols(),
        map.contributing_anchors()
    );
    match map.best_cell() {
        Some(best) => println!(
            "Best cup placement: ({:.2}, {:.2}) score {:.4}",
            best.position[0], best.position[1], best.value
        ),
        None => println!("No anchor has learned statistics for the cup"),
    }
}
