use std::io::{self, Write};

use crate::config::Config;
use crate::state::{Hop, Target, TraceResult};
use crate::trace::{LatencyJump, TraceObserver};

/// Opening line printed once the destination is resolved
pub fn format_banner(target: &Target, config: &Config) -> String {
    format!(
        "Tracing route to {} [{}], over a maximum of {} hops, starting from {}:",
        target.original, target.resolved, config.max_ttl, config.first_hop
    )
}

/// One line per hop, traceroute style
pub fn format_hop(hop: &Hop) -> String {
    match hop.responder {
        Some(ip) => format!(
            "{} - {} [{}] - time elapsed: {:?}",
            hop.ttl,
            ip,
            hop.names.join(" "),
            hop.latency
        ),
        None => format!("{} - * - Request timed out", hop.ttl),
    }
}

/// Final status line
pub fn completion_line(result: &TraceResult) -> &'static str {
    if result.destination_reached {
        "Trace Complete"
    } else {
        "Not Found, please consider increase TTL"
    }
}

/// Write the completion line and the latency jump report
pub fn write_summary<W: Write>(
    result: &TraceResult,
    jump: &LatencyJump<'_>,
    mut writer: W,
) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", completion_line(result))?;
    writeln!(writer)?;
    writeln!(
        writer,
        "The largest difference in response time between consecutive hops is {:?}",
        jump.delta
    )?;
    if let Some((earlier, later)) = jump.pair {
        writeln!(writer, "Between hops:")?;
        writeln!(writer, "{}", format_hop(earlier))?;
        writeln!(writer, "{}", format_hop(later))?;
    }
    Ok(())
}

/// Prints the banner and hop lines while the trace runs
pub struct LinePrinter<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> LinePrinter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush()) {
            tracing::warn!(error = %e, "output failed, stopping trace");
            self.error = Some(e);
        }
    }

    /// Give back the writer, or the first write error
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.writer),
        }
    }
}

impl<W: Write> TraceObserver for LinePrinter<W> {
    fn on_start(&mut self, target: &Target, config: &Config) {
        let banner = format_banner(target, config);
        self.line(&banner);
        self.line("");
    }

    fn on_hop(&mut self, hop: &Hop) {
        let line = format_hop(hop);
        self.line(&line);
    }

    fn interrupted(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HopFailure;
    use crate::trace::largest_jump;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    fn sample() -> TraceResult {
        let mut result = TraceResult::new(Target::new("dest".into(), ip(3)), Config::default());
        result.hops = vec![
            Hop::responded(1, ip(1), vec!["gw.lan".into()], Duration::from_millis(1)),
            Hop::failed(2, HopFailure::Timeout, Duration::from_secs(3)),
            Hop::responded(3, ip(3), Vec::new(), Duration::from_millis(9)),
        ];
        result.destination_reached = true;
        result
    }

    #[test]
    fn test_format_hop_lines() {
        let result = sample();
        assert_eq!(
            format_hop(&result.hops[0]),
            "1 - 10.0.0.1 [gw.lan] - time elapsed: 1ms"
        );
        assert_eq!(format_hop(&result.hops[1]), "2 - * - Request timed out");
    }

    #[test]
    fn test_banner() {
        let result = sample();
        assert_eq!(
            format_banner(&result.target, &result.config),
            "Tracing route to dest [10.0.0.3], over a maximum of 30 hops, starting from 1:"
        );
    }

    #[test]
    fn test_summary_with_pair() {
        let result = sample();
        let jump = largest_jump(&result.hops);
        let mut buf = Vec::new();
        write_summary(&result, &jump, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Trace Complete"));
        assert!(text.contains("consecutive hops is 8ms"));
        assert!(text.contains("Between hops:\n1 - 10.0.0.1"));
        assert!(text.contains("3 - 10.0.0.3 [] - time elapsed: 9ms"));
    }

    #[test]
    fn test_summary_not_found_without_pair() {
        let mut result = sample();
        result.hops.truncate(2);
        result.destination_reached = false;
        let jump = largest_jump(&result.hops);
        let mut buf = Vec::new();
        write_summary(&result, &jump, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Not Found, please consider increase TTL"));
        assert!(text.contains("consecutive hops is 0ns"));
        assert!(!text.contains("Between hops"));
    }

    #[test]
    fn test_line_printer_observer() {
        let result = sample();
        let mut printer = LinePrinter::new(Vec::new());
        printer.on_start(&result.target, &result.config);
        for hop in &result.hops {
            printer.on_hop(hop);
        }
        let text = String::from_utf8(printer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Tracing route to dest"));
        assert_eq!(lines[1], "");
        assert_eq!(lines[3], "2 - * - Request timed out");
    }

    /// Writer whose output is gone
    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_line_printer_interrupts_on_write_error() {
        let result = sample();
        let mut printer = LinePrinter::new(Closed);
        assert!(!printer.interrupted());

        printer.on_start(&result.target, &result.config);
        assert!(printer.interrupted());

        let err = printer.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
