use anyhow::Result;
use clap::Parser;
use std::io::Write;

use hoptrace::cli::Args;
use hoptrace::export::{LinePrinter, export_json, write_summary};
use hoptrace::lookup::{DnsLookup, NoDns, ReverseDns};
use hoptrace::prefs::Prefs;
use hoptrace::probe::SystemTransport;
use hoptrace::trace::{Silent, Tracer, largest_jump};
use hoptrace::{Config, TraceError, TraceResult};

fn main() {
    let args = Args::parse();
    hoptrace::logging::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.downcast_ref::<TraceError>().and_then(TraceError::hint) {
            eprintln!("\n{}", hint);
        }
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args
        .to_config(&Prefs::load())
        .map_err(anyhow::Error::msg)?;
    tracing::debug!(?config, "effective configuration");

    let tracer = Tracer::new(config.clone(), SystemTransport, reverse_dns(&config));

    let result = if args.json {
        tracer.trace(&args.destination, &mut Silent)?
    } else {
        let mut printer = LinePrinter::new(std::io::stdout().lock());
        let result = tracer.trace(&args.destination, &mut printer)?;
        drop(printer.finish()?);
        result
    };

    report(&result, args.json)
}

/// Reverse DNS is best-effort; a broken resolver setup just disables names
fn reverse_dns(config: &Config) -> Box<dyn ReverseDns> {
    if !config.dns_enabled {
        return Box::new(NoDns);
    }
    match DnsLookup::new() {
        Ok(dns) => Box::new(dns),
        Err(e) => {
            tracing::warn!(error = %e, "reverse DNS unavailable");
            Box::new(NoDns)
        }
    }
}

fn report(result: &TraceResult, json: bool) -> Result<()> {
    let jump = largest_jump(&result.hops);
    let mut stdout = std::io::stdout().lock();
    if json {
        export_json(result, &jump, &mut stdout)?;
        writeln!(stdout)?;
    } else {
        write_summary(result, &jump, &mut stdout)?;
    }
    Ok(())
}
