mod tests_collector;
