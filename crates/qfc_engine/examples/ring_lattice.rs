//! QFC ring lattice walkthrough
//!
//! Classifies a 4-qubit ring under each boundary preset, prints the
//! collision report, then optimizes gate directions.

use qfc_engine::prelude::*;

fn main() -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║          QFC Ring Lattice Collision Report           ║");
    println!("╚══════════════════════════════════════════════════════╝\n");

    let lattice = Lattice::ring(4);
    let frequencies = vec![5.00, 5.02, 5.10, 4.90];

    if let Some(stats) = FrequencyStats::from_frequencies(&frequencies) {
        println!("{}\n", stats);
    }

    for preset in BoundaryPreset::ALL {
        let config = CollisionConfig::standard().with_preset(preset);
        let table = config.table_from_frequencies(frequencies.clone());

        println!("═══════════════════════════════════════════════════════");
        println!("  Preset: {}", preset);
        println!("═══════════════════════════════════════════════════════");

        let mut pipeline = CollisionPipeline::new(lattice.clone(), table, config.clone())?;
        let analysis = pipeline.run()?;

        println!("Initial gates: {:?}", analysis.gates.to_pairs());
        println!("{}", format_summary(&analysis.list));
        println!();
        for pass in &analysis.optimized.passes {
            println!("  {}", pass);
        }
        println!("Optimized gates: {:?}", analysis.optimized.gates.to_pairs());
        println!("{}", format_summary(&analysis.final_list));
        println!();
        println!(
            "{}\n",
            range_report(&analysis.final_list, config.effective_absolute_range())
        );
    }

    Ok(())
}
