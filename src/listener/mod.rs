mod event_printer;
mod event_writer;

pub use event_printer::EventPrinter;
pub use event_writer::EventWriter;
