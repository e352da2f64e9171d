mod helpers;
mod session_tests;
