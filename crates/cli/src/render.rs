use finance_tracker_core::errors::ClientError;
use finance_tracker_core::models::chart::{ChartSpec, ChartStyle};
use finance_tracker_core::models::message::Message;
use finance_tracker_core::services::chart_service::ChartRenderer;
use finance_tracker_core::services::transaction_service::{TransactionView, EMPTY_PLACEHOLDER};

const BAR_WIDTH: usize = 40;

/// Draws charts as horizontal text bars on stdout.
#[derive(Debug, Default)]
pub struct TerminalChart {
    next_id: u64,
    live: usize,
}

impl TerminalChart {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(fraction: f64) -> String {
        let len = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        "█".repeat(len)
    }
}

impl ChartRenderer for TerminalChart {
    type Handle = u64;

    fn create(&mut self, spec: &ChartSpec) -> Result<u64, ClientError> {
        let label_width = spec.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let bar_width = BAR_WIDTH;
        let mut lines = vec![spec.title.clone(), "-".repeat(spec.title.len())];

        match spec.style {
            ChartStyle::Pie => {
                let total: f64 = spec.values.iter().map(|v| v.abs()).sum();
                if total == 0.0 {
                    return Err(ClientError::Chart("All values are zero".into()));
                }
                for (label, value) in spec.labels.iter().zip(&spec.values) {
                    let share = value.abs() / total;
                    lines.push(format!(
                        "{label:<label_width$}  {:<bar_width$}  {:>5.1}%  ${value:.2}",
                        Self::bar(share),
                        share * 100.0,
                    ));
                }
            }
            ChartStyle::Line => {
                let max = spec.values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
                for (label, value) in spec.labels.iter().zip(&spec.values) {
                    let fraction = if max == 0.0 { 0.0 } else { value.abs() / max };
                    lines.push(format!(
                        "{label:<label_width$}  {:<bar_width$}  ${value:.2}",
                        Self::bar(fraction),
                    ));
                }
            }
        }

        println!("{}", lines.join("\n"));

        self.next_id += 1;
        self.live += 1;
        tracing::debug!(id = self.next_id, live = self.live, "Chart created");
        Ok(self.next_id)
    }

    fn dispose(&mut self, handle: u64) {
        self.live = self.live.saturating_sub(1);
        tracing::debug!(id = handle, live = self.live, "Chart disposed");
    }
}

pub fn print_transactions(view: TransactionView<'_>) {
    match view {
        TransactionView::NotLoaded => {}
        TransactionView::Empty => println!("{EMPTY_PLACEHOLDER}"),
        TransactionView::Rows(rows) => {
            let class_width = rows
                .iter()
                .map(|t| t.class_name.chars().count())
                .max()
                .unwrap_or(0)
                .max("Class".len());
            println!("{:>6}  {:<10}  {:<class_width$}  {:>12}", "ID", "Date", "Class", "Amount");
            for tx in rows {
                println!(
                    "{:>6}  {:<10}  {:<class_width$}  {:>12}",
                    tx.id,
                    tx.time.to_string(),
                    tx.class_name,
                    tx.display_amount(),
                );
            }
        }
    }
}

pub fn print_messages(messages: &[Message]) {
    for message in messages {
        println!("{message}");
    }
}
