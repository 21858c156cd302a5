pub mod appointment_writer;
