mod job_id;
pub use job_id::JobId;

mod lookup;
pub use lookup::LookupList;

mod quantiles;
pub use quantiles::Quantiles;
