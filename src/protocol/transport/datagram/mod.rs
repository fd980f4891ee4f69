//! Single-slot datagram server over a CAN-FD controller.
//!
//! The transport holds at most one outstanding asynchronous read and is
//! deliberately not a queue: a frame arriving while no reader is armed
//! is discarded. The remote register-protocol engine re-arms the slot
//! after processing each request, and anything that arrives in between
//! never existed as far as this layer is concerned.
use crate::protocol::transport::can_frame::{
    round_up_dlc, FdFrame, MAX_DATAGRAM_PAYLOAD, PAD_BYTE,
};
use crate::protocol::transport::can_id::{is_register_protocol, DatagramId};
use crate::protocol::transport::traits::fdcan_driver::FdCanDriver;

//==================================================================================HEADER
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Resolved addressing of a received datagram, handed to the read
/// completion alongside the payload.
pub struct DatagramHeader {
    /// Node address of the sender.
    pub source: u8,
    /// Node address this datagram was directed at.
    pub destination: u8,
    /// Size the frame declared on the wire. May exceed the number of
    /// bytes actually delivered when the reader armed a smaller buffer.
    pub size: usize,
}

//==================================================================================POLL_DISPOSITION
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of one transport poll tick.
pub enum PollDisposition {
    /// The controller had no frame for us.
    Idle,
    /// A frame arrived with an identifier above 16 bits. It is not a
    /// register-protocol datagram; the caller may hand it to whatever
    /// other protocol shares the bus.
    Foreign,
    /// A register-protocol frame arrived while no reader was armed and
    /// was discarded.
    Dropped,
    /// The pending read completed and its callback ran.
    Delivered,
}

//==================================================================================TRANSPORT
/// At most one pending read at a time.
struct PendingRead<F> {
    max_len: usize,
    callback: F,
}

/// Datagram transport owning the CAN-FD controller.
///
/// Writes are synchronous: pad to a legal DLC, hand to the controller,
/// and complete immediately with the original (unpadded) byte count.
/// Reads are armed with [`async_read`](Self::async_read) and complete
/// on a later [`poll`](Self::poll) tick.
pub struct DatagramTransport<C, F>
where
    C: FdCanDriver,
    F: FnMut(DatagramHeader, &[u8]),
{
    driver: C,
    pending: Option<PendingRead<F>>,
}

impl<C, F> DatagramTransport<C, F>
where
    C: FdCanDriver,
    F: FnMut(DatagramHeader, &[u8]),
{
    /// Wrap an initialised controller.
    pub fn new(driver: C) -> Self {
        Self {
            driver,
            pending: None,
        }
    }

    /// Largest payload one datagram can carry.
    pub const fn max_payload(&self) -> usize {
        MAX_DATAGRAM_PAYLOAD
    }

    /// Borrow the underlying controller (bus-off supervision).
    pub fn driver(&self) -> &C {
        &self.driver
    }

    /// Mutably borrow the underlying controller.
    pub fn driver_mut(&mut self) -> &mut C {
        &mut self.driver
    }

    /// Whether a read is currently armed.
    pub fn read_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arm the read slot. The callback fires on the poll tick that
    /// delivers the next matching frame, with the resolved header and
    /// at most `max_len` payload bytes.
    ///
    /// Arming a second read while one is outstanding is a caller bug
    /// and asserts.
    pub fn async_read(&mut self, max_len: usize, callback: F) {
        assert!(
            self.pending.is_none(),
            "a datagram read is already pending"
        );
        self.pending = Some(PendingRead {
            max_len: max_len.min(MAX_DATAGRAM_PAYLOAD),
            callback,
        });
    }

    /// Send one datagram. The payload must fit a single frame; when
    /// DLC rounding grows it, the tail is padded with [`PAD_BYTE`].
    /// The completion callback runs before return and reports the
    /// original payload length, not the padded one.
    pub fn async_write(&mut self, id: DatagramId, data: &[u8], callback: impl FnOnce(usize)) {
        assert!(
            data.len() <= MAX_DATAGRAM_PAYLOAD,
            "datagram payload exceeds one CAN-FD frame"
        );
        let dlc = round_up_dlc(data.len());

        if dlc == data.len() {
            self.driver.send(id.raw() as u32, data);
        } else {
            let mut buf = [0u8; MAX_DATAGRAM_PAYLOAD];
            buf[..data.len()].copy_from_slice(data);
            buf[data.len()..dlc].fill(PAD_BYTE);
            self.driver.send(id.raw() as u32, &buf[..dlc]);
        }

        callback(data.len());
    }

    /// Non-blocking receive attempt; call once per loop iteration.
    ///
    /// Delivers at most one frame to the armed reader, clearing the
    /// slot. See [`PollDisposition`] for the other outcomes.
    pub fn poll(&mut self) -> PollDisposition {
        let mut frame = FdFrame::new();
        if !self.driver.poll(&mut frame) {
            return PollDisposition::Idle;
        }

        if !is_register_protocol(frame.id) {
            return PollDisposition::Foreign;
        }

        let Some(pending) = self.pending.take() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("datagram dropped: no reader armed (id={=u32:#x})", frame.id);
            return PollDisposition::Dropped;
        };

        let id = DatagramId::from_raw(frame.id as u16);
        let header = DatagramHeader {
            source: id.source,
            destination: id.destination,
            size: frame.len,
        };
        let delivered = frame.len.min(pending.max_len);

        let mut callback = pending.callback;
        callback(header, &frame.data[..delivered]);

        PollDisposition::Delivered
    }
}
