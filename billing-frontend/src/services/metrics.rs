use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Result of a bill calculation request as seen by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationOutcome {
    Ok,
    Invalid,
    Failed,
}

impl CalculationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationOutcome::Ok => "ok",
            CalculationOutcome::Invalid => "invalid",
            CalculationOutcome::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Ok,
    Invalid,
    Missing,
}

impl PinOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinOutcome::Ok => "ok",
            PinOutcome::Invalid => "invalid",
            PinOutcome::Missing => "missing",
        }
    }
}

/// Prometheus registry owned by one application instance.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub bill_calculations_total: IntCounterVec,
    pub admin_pin_verifications_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )?;

        let bill_calculations_total = IntCounterVec::new(
            Opts::new("bill_calculations_total", "Bill calculation requests by outcome"),
            &["outcome"],
        )?;

        let admin_pin_verifications_total = IntCounterVec::new(
            Opts::new(
                "admin_pin_verifications_total",
                "Admin PIN verification attempts by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(bill_calculations_total.clone()))?;
        registry.register(Box::new(admin_pin_verifications_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            bill_calculations_total,
            admin_pin_verifications_total,
        })
    }

    pub fn observe_request(&self, method: &str, path: &str, status: &str, seconds: f64) {
        let labels = [method, path, status];
        self.http_requests_total.with_label_values(&labels).inc();
        self.http_request_duration_seconds
            .with_label_values(&labels)
            .observe(seconds);
    }

    pub fn record_calculation(&self, outcome: CalculationOutcome) {
        self.bill_calculations_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn record_pin_verification(&self, outcome: PinOutcome) {
        self.admin_pin_verifications_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
