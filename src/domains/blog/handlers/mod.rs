pub mod blog_handler;
