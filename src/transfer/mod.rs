// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Transfer stage
//!
//! Builds the per-day command plan and runs it over one encrypted control
//! session driven by an external client.

pub mod command;
pub mod driver;
pub mod lftp;
pub mod mock;
pub mod observer;
pub mod plan;
pub mod session;

pub use command::SessionCommand;
pub use driver::{run_transfer, DayResult, DayStatus, TransferSummary};
pub use lftp::LftpClient;
pub use mock::MockTransferClient;
pub use observer::{ConsoleObserver, NoopTransferObserver, TransferObserver};
pub use plan::{DayPlan, TransferPlan};
pub use session::{open_session, CommandOutcome, TransferClient, TransferSession, CONNECT_TIMEOUT};
