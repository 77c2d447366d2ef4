//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter     | Implements    | Connects to                    |
//! |-------------|---------------|--------------------------------|
//! | `log_sink`  | EventSink     | `log` facade                   |
//! | `simulated` | StatusService | In-process simulated backend   |

pub mod log_sink;
pub mod simulated;
