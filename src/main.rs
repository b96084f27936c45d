// src/main.rs
// CODONSMITH: Codon optimization for heterologous expression.
// Entry point for the Command Line Interface.
// Handles logging setup, thread pool sizing, FASTA streaming and result reporting.

mod cli;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use codonsmith::codon_table::{available_organisms, CodonTable};
use codonsmith::fasta::FastaBatchIterator;
use codonsmith::parallel::ParallelProcessor;
use codonsmith::weights::CodonWeights;
use codonsmith::{CodonOptimizer, BATCH_MAX_BYTES, BATCH_MAX_RECORDS};

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // LOGGING: RUST_LOG wins, otherwise info (debug with --verbose)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // CONCURRENCY CONFIGURATION
    rayon::ThreadPoolBuilder::new()
    .num_threads(cli.jobs)
    .build_global()
    .map_err(|e| anyhow::anyhow!("Failed to configure thread pool: {}", e))?;

    match &cli.command {
        // COMMAND: OPTIMIZE (Single protein)
        Commands::Optimize { protein, json, options } => {
            let config = options.to_config().context("Invalid optimization settings")?;
            let optimizer = CodonOptimizer::from_data_dir(config, &options.data_dir)
                .context("Failed to initialize optimizer")?;

            let gc_window = optimizer.config().effective_gc_bounds();
            let report = optimizer
                .optimize_with_report(protein)
                .context("Optimization failed")?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("[*] Organism: {} | Strategy: {}", report.organism, report.strategy);
            println!("Optimization Sequence : {}, type: {}", report.sequence, report.sequence.kind());
            println!("--------------------------------------------------");
            println!("    Length:          {} bp", report.sequence.len());
            println!(
                "    GC Content:      {:.2}% ({} {:.1}-{:.1}%)",
                report.stability.gc_content,
                if report.stability.gc_within(gc_window) { "inside" } else { "outside" },
                gc_window.0,
                gc_window.1
            );
            println!("    Melting Temp:    {:.1}°C", report.stability.melting_temp);
            match report.cai {
                Some(cai) => println!("    CAI:             {:.4}", cai),
                None => println!("    CAI:             n/a"),
            }
            if !report.warnings.is_empty() {
                println!("    Below Threshold: {} codons", report.warnings.len());
            }
            println!("--------------------------------------------------");
        }

        // COMMAND: BATCH (FASTA in, FASTA out)
        Commands::Batch { input, output, line_width, options } => {
            let config = options.to_config().context("Invalid optimization settings")?;
            let optimizer = CodonOptimizer::from_data_dir(config, &options.data_dir)
                .context("Failed to initialize optimizer")?;

            println!("[*] Optimizing records from {} (strategy: {})...", input.display(), optimizer.strategy_name());
            println!("[i] Threads: {}", rayon::current_num_threads());

            let input_file = File::open(input).context(format!("Failed to open input: {}", input.display()))?;
            let reader = BufReader::new(input_file);
            let output_file = File::create(output).context(format!("Failed to create output: {}", output.display()))?;
            let mut writer = BufWriter::new(output_file);

            let batcher = FastaBatchIterator::new(reader, BATCH_MAX_RECORDS, BATCH_MAX_BYTES);
            let mut total = 0usize;
            let mut failed = 0usize;

            for batch_result in batcher {
                let batch = batch_result.context("Failed to read FASTA input")?;
                total += batch.len();

                for result in ParallelProcessor::optimize_records(&optimizer, batch) {
                    match &result.outcome {
                        Ok(_) => {
                            if let Some(entry) = result.fasta_entry(*line_width) {
                                writer.write_all(entry.as_bytes())?;
                            }
                        }
                        Err(e) => {
                            failed += 1;
                            let cause = e.root_cause();
                            println!("    [!] {}: {}", result.header, cause);
                        }
                    }
                }
            }
            writer.flush()?;

            println!("\n[✔] Batch Finished.");
            println!("--------------------------------------------------");
            println!("    Records Read:    {}", total);
            println!("    Optimized:       {}", total - failed);
            println!("    Failed:          {}", failed);
            println!("    Output File:     {}", output.display());
            println!("--------------------------------------------------");

            if failed > 0 {
                anyhow::bail!("{} of {} records could not be optimized", failed, total);
            }
        }

        // COMMAND: WEIGHTS (Relative adaptiveness table)
        Commands::Weights { organism, data_dir } => {
            let table = CodonTable::load_organism(organism, data_dir)
                .context(format!("Failed to load codon table for {}", organism))?;
            let weights = CodonWeights::from_table(&table);

            println!("[*] Codon weights for {}", organism);
            for (amino_acid, synonyms) in table.iter() {
                let row: Vec<String> = synonyms
                    .iter()
                    .map(|u| format!("{}={:.3}", u.codon, weights.get(&u.codon).unwrap_or(0.0)))
                    .collect();
                println!("    {}  {}", amino_acid, row.join("  "));
            }
        }

        // COMMAND: ORGANISMS (Available tables)
        Commands::Organisms { data_dir } => {
            let organisms = available_organisms(data_dir)
                .context(format!("Failed to read data directory: {}", data_dir.display()))?;
            if organisms.is_empty() {
                println!("[!] No codon tables found in {}", data_dir.display());
            } else {
                println!("[*] Codon tables in {}:", data_dir.display());
                for organism in organisms {
                    println!("    {}", organism);
                }
            }
        }
    }
    Ok(())
}
