use std::io::{self, Write};

use tabled::{
    Table,
    settings::{Style, panel::Header},
};
use tracing::debug;

use crate::{Aggregate, Interval, Market, PriceRange, VolumeShare, format::General};

/// Marker emitted once between the two report tables.
pub const DELIMITER: &str = "#";

/// Both report tables over a finished [`Market`].
///
/// Rows are produced on demand while iterating, so memory stays flat no
/// matter how many intervals the market spans. The market is only borrowed,
/// so nothing can change it while a report is being read.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    market: &'a Market,
}

/// One event of the rendered report stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    VolumeShare(VolumeShare),
    Delimiter,
    PriceRange(PriceRange),
}

fn volume_share(aggregate: &Aggregate, interval: Interval) -> VolumeShare {
    if aggregate.volume_at(interval).is_none() {
        debug!(symbol = aggregate.symbol(), %interval, "no volume recorded, reporting 0%");
    }
    VolumeShare {
        symbol: aggregate.symbol().to_owned(),
        interval,
        percentage: aggregate.volume_percentage(interval),
    }
}

impl<'a> Report<'a> {
    pub fn generate(market: &'a Market) -> Self {
        Self { market }
    }

    /// Every symbol for every interval in `1..=max_interval_seen`, interval
    /// major then first-seen symbol order. Intervals a symbol never traded
    /// in report 0%.
    pub fn volume_shares(self) -> impl DoubleEndedIterator<Item = VolumeShare> + 'a {
        let market = self.market;
        Interval::up_to(market.max_interval_seen()).flat_map(move |interval| {
            market
                .aggregates()
                .map(move |aggregate| volume_share(aggregate, interval))
        })
    }

    /// Day high and low per symbol, first-seen order.
    pub fn price_ranges(self) -> impl ExactSizeIterator<Item = PriceRange> + 'a {
        self.market.aggregates().map(|aggregate| PriceRange {
            symbol: aggregate.symbol().to_owned(),
            max_high: aggregate.max_high(),
            min_low: aggregate.min_low(),
        })
    }

    /// Volume shares, then exactly one delimiter, then price ranges.
    pub fn lines(self) -> impl Iterator<Item = ReportLine> + 'a {
        self.volume_shares()
            .map(ReportLine::VolumeShare)
            .chain(std::iter::once(ReportLine::Delimiter))
            .chain(self.price_ranges().map(ReportLine::PriceRange))
    }

    /// Comma-separated rendering, one line per event.
    pub fn write_csv<W: Write>(&self, mut out: W, precision: usize) -> io::Result<()> {
        for line in self.lines() {
            match line {
                ReportLine::VolumeShare(row) => writeln!(
                    out,
                    "{},{},{}",
                    row.symbol,
                    row.interval,
                    General::new(row.percentage, precision)
                )?,
                ReportLine::Delimiter => writeln!(out, "{DELIMITER}")?,
                ReportLine::PriceRange(row) => writeln!(
                    out,
                    "{},{},{}",
                    row.symbol,
                    General::new(row.max_high, precision),
                    General::new(row.min_low, precision)
                )?,
            }
        }
        out.flush()
    }
}

impl std::fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shares = Table::new(self.volume_shares())
            .with(Header::new("Volume traded per interval"))
            .with(Style::modern_rounded())
            .to_string();

        let ranges = Table::new(self.price_ranges())
            .with(Header::new("Day high / low"))
            .with(Style::modern_rounded())
            .to_string();

        writeln!(f, "{shares}")?;
        writeln!(f, "{DELIMITER}")?;
        f.write_str(&ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(n: u32) -> Interval {
        n.try_into().unwrap()
    }

    fn csv(report: &Report) -> String {
        let mut out = Vec::new();
        report.write_csv(&mut out, 6).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn vod_bt_scenario() {
        let mut market = Market::new();
        market.ingest("VOD.L", iv(1), 80, 184.1, 182.4);
        market.ingest("BT.LN", iv(1), 25, 449.8, 448.2);
        market.ingest("VOD.L", iv(2), 20, 184.1, 182.4);
        market.ingest("BT.LN", iv(2), 75, 449.8, 448.2);

        let report = Report::generate(&market);

        assert_eq!(
            csv(&report),
            "VOD.L,1,80\n\
             BT.LN,1,25\n\
             VOD.L,2,20\n\
             BT.LN,2,75\n\
             #\n\
             VOD.L,184.1,182.4\n\
             BT.LN,449.8,448.2\n"
        );
    }

    #[test]
    fn missing_interval_reports_zero() {
        let mut market = Market::new();
        market.ingest("A", iv(1), 10, 5.0, 1.0);
        market.ingest("B", iv(1), 5, 6.0, 2.0);
        market.ingest("B", iv(2), 5, 6.0, 2.0);

        let report = Report::generate(&market);

        let rows: Vec<(String, u32, f64)> = report
            .volume_shares()
            .map(|r| (r.symbol, r.interval.value(), r.percentage))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("A".to_owned(), 1, 100.0),
                ("B".to_owned(), 1, 50.0),
                ("A".to_owned(), 2, 0.0),
                ("B".to_owned(), 2, 50.0),
            ]
        );
    }

    #[test]
    fn zero_volume_symbol() {
        let mut market = Market::new();
        market.ingest("Z", iv(1), 0, 3.0, 2.0);

        let report = Report::generate(&market);

        assert_eq!(csv(&report), "Z,1,0\n#\nZ,3,2\n");
    }

    #[test]
    fn empty_market_still_has_delimiter() {
        let market = Market::new();
        let report = Report::generate(&market);

        assert_eq!(report.volume_shares().count(), 0);
        assert_eq!(report.price_ranges().len(), 0);
        assert_eq!(report.lines().collect::<Vec<_>>(), vec![ReportLine::Delimiter]);
        assert_eq!(csv(&report), "#\n");
    }

    #[test]
    fn delimiter_exactly_once_between_tables() {
        let mut market = Market::new();
        for (symbol, interval) in [("A", 1), ("B", 3), ("C", 2)] {
            market.ingest(symbol, iv(interval), 1, 1.0, 1.0);
        }

        let report = Report::generate(&market);
        let lines: Vec<ReportLine> = report.lines().collect();

        let delimiters: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| matches!(l, ReportLine::Delimiter))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(delimiters, vec![9]);
        assert_eq!(lines.len(), 9 + 1 + 3);
    }

    #[test]
    fn sparse_high_interval_is_streamed() {
        let mut market = Market::new();
        market.ingest("A", iv(u32::MAX), 1, 1.0, 1.0);
        market.ingest("B", iv(1), 4, 2.0, 1.5);

        let report = Report::generate(&market);
        let mut shares = report.volume_shares();

        let first = shares.next().unwrap();
        assert_eq!((first.symbol.as_str(), first.interval.value()), ("A", 1));
        assert_eq!(first.percentage, 0.0);

        let second = shares.next().unwrap();
        assert_eq!((second.symbol.as_str(), second.interval.value()), ("B", 1));
        assert_eq!(second.percentage, 100.0);

        let last = shares.next_back().unwrap();
        assert_eq!((last.symbol.as_str(), last.interval.value()), ("B", u32::MAX));
        assert_eq!(last.percentage, 0.0);

        let before_last = shares.next_back().unwrap();
        assert_eq!((before_last.symbol.as_str(), before_last.interval.value()), ("A", u32::MAX));
        assert_eq!(before_last.percentage, 100.0);

        let mut out = Vec::new();
        for line in report.lines().take(4) {
            if let ReportLine::VolumeShare(row) = line {
                out.push(format!("{},{}", row.symbol, row.interval));
            }
        }
        assert_eq!(out, vec!["A,1", "B,1", "A,2", "B,2"]);
    }

    #[test]
    fn generation_leaves_market_untouched() {
        let mut market = Market::new();
        market.ingest("A", iv(2), 10, 5.0, 1.0);

        let first = csv(&Report::generate(&market));
        let second = csv(&Report::generate(&market));

        assert_eq!(first, second);
        assert_eq!(market.max_interval_seen(), 2);
        assert_eq!(market.lookup("A").unwrap().intervals().len(), 1);
    }

    #[test]
    fn table_rendering_contains_rows() {
        let mut market = Market::new();
        market.ingest("VOD.L", iv(1), 80, 184.1, 182.4);

        let rendered = Report::generate(&market).to_string();

        assert!(rendered.contains("Volume traded per interval"));
        assert!(rendered.contains("Day high / low"));
        assert!(rendered.contains("VOD.L"));
        assert_eq!(rendered.lines().filter(|l| *l == DELIMITER).count(), 1);
    }
}
