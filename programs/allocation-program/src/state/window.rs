use anchor_lang::prelude::*;

use crate::error::AllocationError;

// 8 start_time + 8 end_time
pub const SALE_WINDOW_SIZE: usize = 8 + 8;

/// Half-open time window `[start_time, end_time)` during which a sale accepts demand.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleWindow {
    pub start_time: i64,
    pub end_time: i64,
}

impl SaleWindow {
    pub fn new(start_time: i64, end_time: i64, now: i64, max_duration: i64) -> Result<Self> {
        require!(end_time > start_time, AllocationError::InvalidWindow);
        require!(end_time > now, AllocationError::InvalidWindow);
        let duration = end_time
            .checked_sub(start_time)
            .ok_or(AllocationError::ArithmeticOverflow)?;
        require!(duration <= max_duration, AllocationError::InvalidWindow);

        Ok(Self {
            start_time,
            end_time,
        })
    }

    pub fn ensure_open(&self, now: i64) -> Result<()> {
        require!(now >= self.start_time, AllocationError::WindowNotOpen);
        require!(now < self.end_time, AllocationError::WindowClosed);
        Ok(())
    }

    pub fn ensure_closed(&self, now: i64) -> Result<()> {
        require!(now >= self.end_time, AllocationError::WindowStillOpen);
        Ok(())
    }

    pub fn is_closed(&self, now: i64) -> bool {
        now >= self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_error;

    const DAY: i64 = 24 * 60 * 60;

    #[test]
    fn rejects_inverted_or_oversized_windows() {
        assert_error(SaleWindow::new(10, 10, 0, DAY), AllocationError::InvalidWindow);
        assert_error(SaleWindow::new(0, 2 * DAY, 0, DAY), AllocationError::InvalidWindow);
        assert_error(SaleWindow::new(-DAY, -1, 0, DAY), AllocationError::InvalidWindow);
    }

    #[test]
    fn open_and_closed_boundaries() {
        let window = SaleWindow::new(DAY, 2 * DAY, 0, 30 * DAY).unwrap();

        assert_error(window.ensure_open(DAY - 1), AllocationError::WindowNotOpen);
        assert!(window.ensure_open(DAY).is_ok());
        assert!(window.ensure_open(2 * DAY - 1).is_ok());
        assert_error(window.ensure_open(2 * DAY), AllocationError::WindowClosed);

        assert_error(window.ensure_closed(2 * DAY - 1), AllocationError::WindowStillOpen);
        assert!(window.ensure_closed(2 * DAY).is_ok());
        assert!(window.is_closed(3 * DAY));
    }
}
